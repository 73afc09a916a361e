//! promptstore: versioned text/JSON prompts kept in an S3 bucket.
//!
//! - [`storage`]: the bucket-scoped [`storage::VersionedStore`] adapter (S3 and in-memory).
//! - [`prompt`]: the [`prompt::PromptStore`] facade (get, list, list versions, rollback).
//! - [`mcp`]: MCP tools for agents.
//! - [`command`] / [`cli`]: maintenance commands (upload, download, list-versions, rollback, ...).
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod mcp;
pub mod prompt;
pub mod storage;
