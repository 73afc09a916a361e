//! Implements `download`: mirror every key under a prefix into a local directory.
//!
//! A listing failure aborts the run. After that each key is fetched and written
//! independently; failures are reported, skipped, and reflected in the exit code.

use std::path::{Component, Path, PathBuf};

use clap::Parser;
use colored::Colorize;

use crate::{
    command::{self, TransferReport},
    config::StoreArgs,
    error::CommandError,
    prompt::{DEFAULT_PREFIX, PromptStore},
};

#[derive(Parser, Debug)]
pub struct DownloadArgs {
    /// Only download keys starting with this prefix
    #[arg(long, default_value = DEFAULT_PREFIX)]
    pub prefix: String,

    /// Local directory to write into
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    #[command(flatten)]
    pub store: StoreArgs,
}

pub async fn execute(args: DownloadArgs) -> Result<(), CommandError> {
    let prompts = command::connect(args.store).await?;
    println!(
        "Downloading prompts from '{}' to '{}'...",
        prompts.bucket(),
        args.dir.display()
    );
    download_prefix(&prompts, &args.prefix, &args.dir)
        .await?
        .finish("downloads")
}

/// Local path for `key` below `root`, or `None` if the key would escape `root`.
///
/// Empty segments are dropped, so `a//b` and `/a/b` land at `root/a/b`.
pub fn local_path(root: &Path, key: &str) -> Option<PathBuf> {
    let mut path = root.to_path_buf();
    let mut pushed = false;
    for segment in key.split('/').filter(|s| !s.is_empty()) {
        let mut components = Path::new(segment).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(part)), None) => {
                path.push(part);
                pushed = true;
            }
            _ => return None,
        }
    }
    pushed.then_some(path)
}

pub async fn download_prefix(
    prompts: &PromptStore,
    prefix: &str,
    root: &Path,
) -> Result<TransferReport, CommandError> {
    let keys = prompts.list_prompts(prefix).await?;
    let mut report = TransferReport::default();
    if keys.is_empty() {
        println!("No prompts found.");
        return Ok(report);
    }

    // zero-byte "folder" placeholders created by web consoles
    for key in keys.into_iter().filter(|k| !k.ends_with('/')) {
        let Some(path) = local_path(root, &key) else {
            eprintln!("{}", format!("✗ Refusing to download {key}: unsafe key").red());
            report.failure(key, "key escapes the target directory".to_string());
            continue;
        };

        println!("Downloading {key}...");
        match write_object(prompts, &key, &path).await {
            Ok(()) => {
                println!("{}", format!("✓ Downloaded {key}").green());
                report.success(key);
            }
            Err(e) => {
                eprintln!("{}", format!("✗ Failed to download {key}: {e}").red());
                report.failure(key, e.to_string());
            }
        }
    }
    Ok(report)
}

async fn write_object(prompts: &PromptStore, key: &str, path: &Path) -> Result<(), CommandError> {
    let object = prompts.backend().fetch(key, None).await?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, &object.bytes)?;
    Ok(())
}
