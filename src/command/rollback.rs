//! Implements `rollback`: make an older version the latest content of a key.
//!
//! The old version is copied onto the key, so history only ever grows and the
//! restored content gets a new version id.

use clap::Parser;
use colored::Colorize;

use crate::{command, config::StoreArgs, error::CommandError, prompt::PromptStore};

#[derive(Parser, Debug)]
#[command(after_help = "Example: promptstore rollback prompts/agent/system.txt v123456")]
pub struct RollbackArgs {
    /// Key of the prompt to roll back
    pub key: String,

    /// Version to restore
    pub version_id: String,

    #[command(flatten)]
    pub store: StoreArgs,
}

pub async fn execute(args: RollbackArgs) -> Result<(), CommandError> {
    let prompts = command::connect(args.store).await?;
    rollback(&prompts, &args.key, &args.version_id).await
}

pub async fn rollback(
    prompts: &PromptStore,
    key: &str,
    version_id: &str,
) -> Result<(), CommandError> {
    println!("Rolling back '{key}' to version '{version_id}'...");
    // reported once, by the caller
    let new_version = prompts.rollback(key, version_id).await?;

    println!(
        "{}",
        format!("✓ Successfully rolled back '{key}' to version '{version_id}'.").green()
    );
    match new_version {
        Some(id) => println!("This is now the latest version (new version id: {id})."),
        None => println!("This is now the latest version."),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bytes::Bytes;

    use super::*;
    use crate::storage::memory::MemoryStore;

    #[tokio::test]
    async fn test_rollback_command_restores_content() {
        let prompts = PromptStore::new(Arc::new(MemoryStore::default()));
        let key = "prompts/agent/system.txt";
        let v1 = prompts
            .upload_prompt(key, Bytes::from("original"), "text/plain")
            .await
            .unwrap()
            .unwrap();
        prompts
            .upload_prompt(key, Bytes::from("edited"), "text/plain")
            .await
            .unwrap();

        rollback(&prompts, key, &v1).await.unwrap();
        assert_eq!(prompts.get_prompt(key, None).await.unwrap(), "original");
    }

    #[tokio::test]
    async fn test_rollback_command_fails_on_unknown_version() {
        let prompts = PromptStore::new(Arc::new(MemoryStore::default()));
        let err = rollback(&prompts, "prompts/x.txt", "v0").await.unwrap_err();
        assert!(matches!(err, CommandError::Store(_)));
        assert_eq!(err.exit_code(), 1);
        assert_eq!(
            err.to_string(),
            "object 'prompts/x.txt' (version v0) not found"
        );
    }
}
