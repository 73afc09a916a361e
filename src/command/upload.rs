//! Implements `upload`: walk a local directory and store every file as a new
//! version of the matching key.

use std::path::{Component, Path, PathBuf};

use bytes::Bytes;
use clap::Parser;
use colored::Colorize;
use walkdir::WalkDir;

use crate::{
    command::{self, TransferReport},
    config::StoreArgs,
    error::CommandError,
    prompt::PromptStore,
};

/// Content type used when the extension tells us nothing.
pub const FALLBACK_CONTENT_TYPE: &str = "text/plain";

#[derive(Parser, Debug)]
pub struct UploadArgs {
    /// Local directory to upload
    #[arg(default_value = "prompts")]
    pub dir: PathBuf,

    /// Key prefix for uploaded files [default: "<dir name>/"]
    #[arg(long)]
    pub prefix: Option<String>,

    #[command(flatten)]
    pub store: StoreArgs,
}

pub async fn execute(args: UploadArgs) -> Result<(), CommandError> {
    let prompts = command::connect(args.store).await?;
    let prefix = args.prefix.unwrap_or_else(|| default_prefix(&args.dir));
    println!(
        "Uploading prompts from '{}' to bucket '{}'...",
        args.dir.display(),
        prompts.bucket()
    );
    upload_dir(&prompts, &args.dir, &prefix)
        .await?
        .finish("uploads")
}

/// `prompts` -> `prompts/`; `.` or `/` -> no prefix.
pub fn default_prefix(dir: &Path) -> String {
    match dir.file_name() {
        Some(name) => format!("{}/", name.to_string_lossy()),
        None => String::new(),
    }
}

/// Object key for a file at `relative` below the upload root, always `/`-separated.
pub fn object_key(prefix: &str, relative: &Path) -> String {
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    format!("{}{}", prefix, parts.join("/"))
}

pub fn content_type_for(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(FALLBACK_CONTENT_TYPE)
        .to_string()
}

/// Upload every regular file below `dir`. A failed file is reported and skipped.
pub async fn upload_dir(
    prompts: &PromptStore,
    dir: &Path,
    prefix: &str,
) -> Result<TransferReport, CommandError> {
    if !dir.is_dir() {
        return Err(CommandError::Invalid(format!(
            "'{}' is not a directory",
            dir.display()
        )));
    }

    let mut report = TransferReport::default();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let item = e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| dir.display().to_string());
                eprintln!("{}", format!("✗ Failed to read {item}: {e}").red());
                report.failure(item, e.to_string());
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(dir).unwrap_or(path);
        let key = object_key(prefix, relative);
        let content_type = content_type_for(path);

        println!("Uploading {key}...");
        let body = match std::fs::read(path) {
            Ok(body) => Bytes::from(body),
            Err(e) => {
                eprintln!("{}", format!("✗ Failed to upload {key}: {e}").red());
                report.failure(key, e.to_string());
                continue;
            }
        };
        match prompts.upload_prompt(&key, body, &content_type).await {
            Ok(_) => {
                println!("{}", format!("✓ Uploaded {key}").green());
                report.success(key);
            }
            Err(e) => {
                eprintln!("{}", format!("✗ Failed to upload {key}: {e}").red());
                report.failure(key, e.to_string());
            }
        }
    }
    Ok(report)
}
