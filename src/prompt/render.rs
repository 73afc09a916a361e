//! Plain-text rendering of facade results, shared by the MCP tools and the CLI.
//!
//! Every function returns a string for every outcome; store failures are
//! downgraded to an `Error: ...` line here and nowhere earlier.
use crate::{
    error::{StoreError, StoreResult},
    storage::ObjectVersion,
};

pub fn prompt(key: &str, result: StoreResult<String>) -> String {
    match result {
        Ok(text) => text,
        Err(StoreError::NotFound { .. }) => format!("Error: Prompt '{key}' not found."),
        Err(e) => format!("Error: failed to fetch prompt '{key}': {e}"),
    }
}

pub fn prompt_list(result: StoreResult<Vec<String>>) -> String {
    match result {
        Ok(keys) if keys.is_empty() => "No prompts found.".to_string(),
        Ok(keys) => keys.join("\n"),
        Err(e) => format!("Error: failed to list prompts: {e}"),
    }
}

/// `- <versionId> | <lastModified> (Latest)`
pub fn version_line(version: &ObjectVersion) -> String {
    let latest = if version.is_latest { " (Latest)" } else { "" };
    format!(
        "- {} | {}{}",
        version.version_id,
        version.last_modified_iso(),
        latest
    )
}

pub fn version_list(key: &str, result: StoreResult<Vec<ObjectVersion>>) -> String {
    match result {
        Ok(versions) if versions.is_empty() => format!("No versions found for '{key}'."),
        Ok(versions) => {
            let mut lines = Vec::with_capacity(versions.len() + 1);
            lines.push(format!("Versions for {key}:"));
            lines.extend(versions.iter().map(version_line));
            lines.join("\n")
        }
        Err(e) => format!("Error: failed to list versions for '{key}': {e}"),
    }
}
