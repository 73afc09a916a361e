//! Implements `list-versions`: human-readable dump of every version under a prefix,
//! grouped by key.

use clap::Parser;

use crate::{
    command,
    config::StoreArgs,
    error::CommandError,
    prompt::{DEFAULT_PREFIX, PromptStore},
    storage::ObjectVersion,
};

#[derive(Parser, Debug)]
pub struct ListVersionsArgs {
    /// Only list versions of keys starting with this prefix
    #[arg(long, default_value = DEFAULT_PREFIX)]
    pub prefix: String,

    #[command(flatten)]
    pub store: StoreArgs,
}

pub async fn execute(args: ListVersionsArgs) -> Result<(), CommandError> {
    let prompts = command::connect(args.store).await?;
    println!(
        "Listing versions in '{}' for prefix '{}'...",
        prompts.bucket(),
        args.prefix
    );
    println!("{}", version_dump(&prompts, &args.prefix).await?);
    Ok(())
}

pub async fn version_dump(prompts: &PromptStore, prefix: &str) -> Result<String, CommandError> {
    let versions = prompts.backend().list_versions_with_prefix(prefix).await?;
    Ok(render_dump(&versions))
}

/// A `File: <key>` header whenever the key changes, then one line per version.
pub fn render_dump(versions: &[ObjectVersion]) -> String {
    if versions.is_empty() {
        return "No versions found.".to_string();
    }
    let mut out = String::new();
    let mut current: Option<&str> = None;
    for v in versions {
        if current != Some(v.key.as_str()) {
            out.push_str(&format!("\nFile: {}\n", v.key));
            current = Some(v.key.as_str());
        }
        let latest = if v.is_latest { " (LATEST)" } else { "" };
        out.push_str(&format!(
            "  - Version: {} | Modified: {}{}\n",
            v.version_id,
            v.last_modified_iso(),
            latest
        ));
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bytes::Bytes;
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::storage::memory::MemoryStore;

    fn version(key: &str, id: &str, latest: bool) -> ObjectVersion {
        ObjectVersion {
            key: key.to_string(),
            version_id: id.to_string(),
            last_modified: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
            is_latest: latest,
        }
    }

    #[test]
    fn test_render_dump_groups_by_key() {
        let out = render_dump(&[
            version("prompts/a.txt", "v2", true),
            version("prompts/a.txt", "v1", false),
            version("prompts/b.txt", "v9", true),
        ]);
        assert_eq!(
            out,
            "\nFile: prompts/a.txt\n\
             \x20 - Version: v2 | Modified: 2024-05-01T10:00:00+00:00 (LATEST)\n\
             \x20 - Version: v1 | Modified: 2024-05-01T10:00:00+00:00\n\
             \n\
             File: prompts/b.txt\n\
             \x20 - Version: v9 | Modified: 2024-05-01T10:00:00+00:00 (LATEST)"
        );
    }

    #[test]
    fn test_render_dump_empty() {
        assert_eq!(render_dump(&[]), "No versions found.");
    }

    #[tokio::test]
    async fn test_version_dump_from_store() {
        let prompts = PromptStore::new(Arc::new(MemoryStore::default()));
        prompts
            .upload_prompt("prompts/a.txt", Bytes::from("1"), "text/plain")
            .await
            .unwrap();
        prompts
            .upload_prompt("prompts/a.txt", Bytes::from("2"), "text/plain")
            .await
            .unwrap();
        let out = version_dump(&prompts, "prompts/").await.unwrap();
        assert_eq!(out.matches("File: prompts/a.txt").count(), 1);
        assert_eq!(out.matches("(LATEST)").count(), 1);
        assert_eq!(out.matches("  - Version: ").count(), 2);
    }
}
