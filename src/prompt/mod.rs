//! Prompt access on top of a [`VersionedStore`].
//!
//! - `get_prompt`: resolve `(key, version?)` to UTF-8 text; a missing key or version is
//!   `StoreError::NotFound`, distinct from valid (possibly empty) content.
//! - `list_prompts`: keys under a prefix; an empty list means nothing matched.
//! - `list_prompt_versions`: version records of exactly one key.
//! - `rollback`: copy an old version onto the key. History is append-only: the old
//!   bytes become latest under a *new* version id and the old id stays fetchable.
pub mod render;

use std::sync::Arc;

use bytes::Bytes;

use crate::{
    error::{StoreError, StoreResult},
    storage::{ObjectVersion, StoredObject, VersionedStore},
};

/// Prefix listed when the caller does not pass one.
pub const DEFAULT_PREFIX: &str = "prompts/";

/// Prompt facade. Cheap to clone; safe to share between concurrent tool calls.
#[derive(Clone)]
pub struct PromptStore {
    store: Arc<dyn VersionedStore>,
}

impl PromptStore {
    pub fn new(store: Arc<dyn VersionedStore>) -> Self {
        Self { store }
    }

    pub fn bucket(&self) -> &str {
        self.store.bucket()
    }

    /// Direct access to the adapter, for scripts moving raw bytes.
    pub fn backend(&self) -> &Arc<dyn VersionedStore> {
        &self.store
    }

    /// Text of `key` at `version`, or at the latest version.
    ///
    /// An empty version string is treated as "latest".
    pub async fn get_prompt(&self, key: &str, version: Option<&str>) -> StoreResult<String> {
        let version = version.filter(|v| !v.is_empty());
        let StoredObject { bytes, .. } = self.store.fetch(key, version).await?;
        String::from_utf8(bytes.to_vec()).map_err(|e| StoreError::InvalidContent {
            key: key.to_string(),
            reason: e.utf8_error().to_string(),
        })
    }

    pub async fn list_prompts(&self, prefix: &str) -> StoreResult<Vec<String>> {
        self.store.list_keys(prefix).await
    }

    pub async fn list_prompt_versions(&self, key: &str) -> StoreResult<Vec<ObjectVersion>> {
        self.store.list_versions(key).await
    }

    /// Make the content of `version_id` the latest content of `key`.
    ///
    /// The version is not checked up front; an unknown id is rejected by the
    /// backend. Returns the id of the newly created latest version.
    pub async fn rollback(&self, key: &str, version_id: &str) -> StoreResult<Option<String>> {
        tracing::info!(key, version_id, "rolling back prompt");
        self.store.copy_version(key, version_id).await
    }

    pub async fn upload_prompt(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> StoreResult<Option<String>> {
        self.store.put(key, body, content_type).await
    }
}
