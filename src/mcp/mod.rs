//! MCP (Model Context Protocol) surface for the prompt store.
//!
//! `PromptMcpServer` implements `rmcp`'s `ServerHandler` and exposes three tools:
//!
//! - `get_prompt(key, version?)`: prompt text, or `Error: Prompt '<key>' not found.`
//! - `list_prompts(prefix = "prompts/")`: newline-joined keys, or `No prompts found.`
//! - `list_prompt_versions(key)`: `Versions for <key>:` followed by one
//!   `- <versionId> | <lastModified>` line per version (` (Latest)` on the current one),
//!   or `No versions found for '<key>'.`
//!
//! # Error conventions
//!
//! Tools never fail at the protocol level for store problems: every outcome is a
//! text result. Backend failures read `Error: failed to ...: <reason>`.
pub mod server;
#[cfg(test)]
mod tests;
pub mod tools;
