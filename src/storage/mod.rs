//! Versioned object store abstraction.
//!
//! A [`VersionedStore`] is bucket-scoped and stateless apart from its client
//! handle. Every backend error is converted to a [`StoreError`] at this
//! boundary: `NotFound` for a missing key/version, `Backend` for the rest.
pub mod memory;
pub mod s3;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::StoreResult;

/// One immutable snapshot of a key, as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectVersion {
    pub key: String,
    /// Backend-assigned, opaque, unique per key.
    pub version_id: String,
    pub last_modified: DateTime<Utc>,
    pub is_latest: bool,
}

impl ObjectVersion {
    /// `2024-05-01T10:00:00+00:00`, or `2024-05-01T10:00:00.123000+00:00`
    /// when there is a fractional part.
    pub fn last_modified_iso(&self) -> String {
        let format = if self.last_modified.timestamp_subsec_nanos() == 0 {
            SecondsFormat::Secs
        } else {
            SecondsFormat::Micros
        };
        self.last_modified.to_rfc3339_opts(format, false)
    }
}

/// Raw content of one version.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bytes: Bytes,
    pub content_type: Option<String>,
    pub version_id: Option<String>,
}

/// Object operations against a single bucket with built-in version history.
#[async_trait]
pub trait VersionedStore: Send + Sync {
    /// Name of the bucket every call is scoped to.
    fn bucket(&self) -> &str;

    /// Content of `key` at `version_id`, or at the latest version when `None`.
    async fn fetch(&self, key: &str, version_id: Option<&str>) -> StoreResult<StoredObject>;

    /// Every key starting with `prefix`. Empty when nothing matches.
    async fn list_keys(&self, prefix: &str) -> StoreResult<Vec<String>>;

    /// Versions of every key starting with `prefix`, in backend order.
    /// Delete markers are not versions and are left out.
    async fn list_versions_with_prefix(&self, prefix: &str) -> StoreResult<Vec<ObjectVersion>>;

    /// Versions of exactly `key`.
    ///
    /// Listing by prefix also returns sibling keys (`a.txt` matches `a.txt.bak`),
    /// so the result is filtered down to the exact key.
    async fn list_versions(&self, key: &str) -> StoreResult<Vec<ObjectVersion>> {
        let versions = self.list_versions_with_prefix(key).await?;
        Ok(versions.into_iter().filter(|v| v.key == key).collect())
    }

    /// Copy `source_version_id` of `key` onto `key`, creating a new latest version.
    /// Returns the new version id when the backend reports one.
    async fn copy_version(&self, key: &str, source_version_id: &str)
    -> StoreResult<Option<String>>;

    /// Write `body` as a new latest version of `key`.
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> StoreResult<Option<String>>;
}
