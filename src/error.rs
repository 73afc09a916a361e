//! Error types shared by the storage adapter, the prompt facade and the CLI.

use thiserror::Error;

/// Errors surfaced by a [`VersionedStore`](crate::storage::VersionedStore).
///
/// `NotFound` is an expected outcome (missing key or version) and must never be
/// retried; every other backend problem collapses into `Backend`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The key, or the requested version of it, does not exist.
    #[error("object '{key}'{} not found", version_suffix(.version))]
    NotFound {
        key: String,
        version: Option<String>,
    },

    /// Any other failure reported by the backend (auth, network, throttling...).
    #[error("backend failure: {0}")]
    Backend(String),

    /// The object exists but its bytes are not usable as prompt text.
    #[error("content of '{key}' is not valid UTF-8: {reason}")]
    InvalidContent { key: String, reason: String },
}

fn version_suffix(version: &Option<String>) -> String {
    match version {
        Some(v) => format!(" (version {v})"),
        None => String::new(),
    }
}

impl StoreError {
    pub fn not_found(key: &str, version: Option<&str>) -> Self {
        StoreError::NotFound {
            key: key.to_string(),
            version: version.map(str::to_string),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that end a CLI invocation with a nonzero exit code.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Command line could not be parsed (also carries `--help`/`--version` output).
    #[error("{0}")]
    Usage(#[from] clap::Error),

    #[error("{0} environment variable not set.")]
    MissingConfig(&'static str),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Some items of a batch failed; each was already reported individually.
    #[error("{failed} of {total} {what} failed")]
    Partial {
        what: &'static str,
        failed: usize,
        total: usize,
    },

    #[error("{0}")]
    Invalid(String),

    #[error("MCP server error: {0}")]
    Server(String),
}

impl CommandError {
    /// Process exit code for this error.
    ///
    /// Help and version output from clap is not a failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            CommandError::Usage(e) if !e.use_stderr() => 0,
            _ => 1,
        }
    }
}
