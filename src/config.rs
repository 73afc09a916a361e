//! Store configuration: which bucket, where it lives, and how to authenticate.
//!
//! Values come from the process environment (a `.env` file is loaded by `main`
//! before parsing) and may be overridden per invocation through CLI flags.
//! The resolved [`StoreConfig`] is immutable for the lifetime of the process.
use std::fmt;

use clap::Args;

use crate::error::CommandError;

pub const BUCKET_ENV: &str = "S3_BUCKET_NAME";
pub const REGION_ENV: &str = "AWS_REGION";
pub const ACCESS_KEY_ENV: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_KEY_ENV: &str = "AWS_SECRET_ACCESS_KEY";
pub const ENDPOINT_ENV: &str = "S3_ENDPOINT_URL";

pub const DEFAULT_REGION: &str = "us-east-1";

/// Connection flags shared by every subcommand that talks to the bucket.
#[derive(Args, Debug, Clone, Default)]
pub struct StoreArgs {
    /// Bucket holding the prompts
    #[arg(long, env = BUCKET_ENV)]
    pub bucket: Option<String>,

    /// AWS region of the bucket
    #[arg(long, env = REGION_ENV)]
    pub region: Option<String>,

    /// Custom endpoint for S3-compatible stores (enables path-style addressing)
    #[arg(long, env = ENDPOINT_ENV)]
    pub endpoint_url: Option<String>,
}

/// Static access key pair. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct StaticCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub bucket: String,
    pub region: String,
    pub endpoint_url: Option<String>,
    /// `None` defers to the default AWS credential chain.
    pub credentials: Option<StaticCredentials>,
}

impl StoreArgs {
    /// Resolve against the process environment.
    pub fn resolve(self) -> Result<StoreConfig, CommandError> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    /// Resolve using `lookup` for values that have no CLI flag.
    ///
    /// Empty strings count as unset.
    pub fn resolve_with<F>(self, lookup: F) -> Result<StoreConfig, CommandError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bucket = non_empty(self.bucket.or_else(|| lookup(BUCKET_ENV)))
            .ok_or(CommandError::MissingConfig(BUCKET_ENV))?;
        let region = non_empty(self.region.or_else(|| lookup(REGION_ENV)))
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        let endpoint_url = non_empty(self.endpoint_url.or_else(|| lookup(ENDPOINT_ENV)));
        if let Some(endpoint) = &endpoint_url
            && url::Url::parse(endpoint).is_err()
        {
            return Err(CommandError::InvalidConfig(format!(
                "{ENDPOINT_ENV} is not a valid URL: {endpoint}"
            )));
        }

        let access_key = non_empty(lookup(ACCESS_KEY_ENV));
        let secret_key = non_empty(lookup(SECRET_KEY_ENV));
        let credentials = match (access_key, secret_key) {
            (Some(access_key_id), Some(secret_access_key)) => Some(StaticCredentials {
                access_key_id,
                secret_access_key,
            }),
            (None, None) => {
                tracing::debug!("no static credentials set, using the default AWS provider chain");
                None
            }
            _ => {
                return Err(CommandError::InvalidConfig(format!(
                    "{ACCESS_KEY_ENV} and {SECRET_KEY_ENV} must be set together"
                )));
            }
        };

        Ok(StoreConfig {
            bucket,
            region,
            endpoint_url,
            credentials,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// The error worth reporting from a `.env` load. Having no file is normal.
pub fn dotenv_failure<T>(result: Result<T, dotenvy::Error>) -> Option<dotenvy::Error> {
    match result {
        Err(e) if !e.not_found() => Some(e),
        _ => None,
    }
}
