//! Subcommand implementations. Each module exposes its clap `Args` and an
//! `execute` entry; the bucket-facing logic sits in separate functions that
//! take a [`PromptStore`] so it can run against any backend.
pub mod download;
pub mod get;
pub mod list;
pub mod list_versions;
pub mod rollback;
pub mod serve;
pub mod upload;
pub mod validate;

use std::sync::Arc;

use colored::Colorize;

use crate::{
    config::StoreArgs,
    error::CommandError,
    prompt::PromptStore,
    storage::s3::S3Store,
};

/// Resolve configuration and build the one client this process will use.
pub async fn connect(args: StoreArgs) -> Result<PromptStore, CommandError> {
    let config = args.resolve()?;
    tracing::debug!(bucket = %config.bucket, region = %config.region, "connecting to S3");
    let store = S3Store::connect(&config).await;
    Ok(PromptStore::new(Arc::new(store)))
}

/// Outcome of a batch transfer where each item fails independently.
#[derive(Debug, Default)]
pub struct TransferReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl TransferReport {
    pub fn success(&mut self, item: String) {
        self.succeeded.push(item);
    }

    pub fn failure(&mut self, item: String, reason: String) {
        self.failed.push((item, reason));
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// Print the summary and turn any failure into a nonzero exit.
    pub fn finish(self, what: &'static str) -> Result<(), CommandError> {
        if self.failed.is_empty() {
            println!("{} {} {}", "Done:".green(), self.succeeded.len(), what);
            return Ok(());
        }
        let total = self.total();
        eprintln!(
            "{}",
            format!("{} of {} {} failed", self.failed.len(), total, what).red()
        );
        Err(CommandError::Partial {
            what,
            failed: self.failed.len(),
            total,
        })
    }
}
