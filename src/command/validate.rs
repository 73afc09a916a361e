//! Implements `validate`: sanity checks on a local prompt directory before upload.
//!
//! - every `.json` file parses as JSON
//! - every `.txt` / `.json` file is UTF-8
//! - each `--require`d file exists

use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use walkdir::WalkDir;

use crate::error::CommandError;

const TEXT_EXTENSIONS: [&str; 2] = ["txt", "json"];

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Local prompt directory
    #[arg(default_value = "prompts")]
    pub dir: PathBuf,

    /// File that must exist, relative to the directory (repeatable)
    #[arg(long = "require", default_values = ["agent/system.txt", "agent/instructions.txt"])]
    pub required: Vec<String>,
}

pub async fn execute(args: ValidateArgs) -> Result<(), CommandError> {
    let problems = validate_dir(&args.dir, &args.required)?;
    if problems.is_empty() {
        println!("{}", format!("✓ {} is valid", args.dir.display()).green());
        return Ok(());
    }
    for problem in &problems {
        eprintln!("{}", format!("✗ {problem}").red());
    }
    Err(CommandError::Invalid(format!(
        "{} problem(s) found in {}",
        problems.len(),
        args.dir.display()
    )))
}

/// All problems found below `dir`; empty when the directory is valid.
pub fn validate_dir(dir: &Path, required: &[String]) -> Result<Vec<String>, CommandError> {
    if !dir.is_dir() {
        return Err(CommandError::Invalid(format!(
            "'{}' is not a directory",
            dir.display()
        )));
    }

    let mut problems = Vec::new();
    for name in required {
        if !dir.join(name).is_file() {
            problems.push(format!("Missing required prompt file: {name}"));
        }
    }

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| CommandError::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if !TEXT_EXTENSIONS.contains(&ext) {
            continue;
        }

        let bytes = std::fs::read(path)?;
        let text = match std::str::from_utf8(&bytes) {
            Ok(text) => text,
            Err(_) => {
                problems.push(format!("File {} is not valid UTF-8", path.display()));
                continue;
            }
        };
        if ext == "json"
            && let Err(e) = serde_json::from_str::<serde_json::Value>(text)
        {
            problems.push(format!("Invalid JSON in {}: {e}", path.display()));
        }
    }
    Ok(problems)
}
