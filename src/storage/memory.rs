//! In-process versioned store with S3 versioning semantics.
//!
//! Keys are kept sorted; each key holds an append-only version list whose last
//! entry is the latest. Used by the test suites and for local dry runs.
use std::{collections::BTreeMap, sync::Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{ObjectVersion, StoredObject, VersionedStore};
use crate::error::{StoreError, StoreResult};

#[derive(Debug, Clone)]
struct MemoryVersion {
    version_id: String,
    bytes: Bytes,
    content_type: String,
    last_modified: DateTime<Utc>,
}

#[derive(Debug)]
pub struct MemoryStore {
    bucket: String,
    objects: Mutex<BTreeMap<String, Vec<MemoryVersion>>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new("memory")
    }
}

impl MemoryStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: Mutex::new(BTreeMap::new()),
        }
    }

    fn objects(&self) -> StoreResult<std::sync::MutexGuard<'_, BTreeMap<String, Vec<MemoryVersion>>>> {
        self.objects
            .lock()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))
    }

    fn append(&self, key: &str, bytes: Bytes, content_type: String) -> StoreResult<String> {
        let version_id = Uuid::now_v7().simple().to_string();
        let mut objects = self.objects()?;
        objects.entry(key.to_string()).or_default().push(MemoryVersion {
            version_id: version_id.clone(),
            bytes,
            content_type,
            last_modified: Utc::now(),
        });
        Ok(version_id)
    }
}

#[async_trait]
impl VersionedStore for MemoryStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn fetch(&self, key: &str, version_id: Option<&str>) -> StoreResult<StoredObject> {
        let objects = self.objects()?;
        let versions = objects
            .get(key)
            .ok_or_else(|| StoreError::not_found(key, version_id))?;
        let found = match version_id {
            Some(id) => versions.iter().find(|v| v.version_id == id),
            None => versions.last(),
        }
        .ok_or_else(|| StoreError::not_found(key, version_id))?;

        Ok(StoredObject {
            bytes: found.bytes.clone(),
            content_type: Some(found.content_type.clone()),
            version_id: Some(found.version_id.clone()),
        })
    }

    async fn list_keys(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let objects = self.objects()?;
        Ok(objects
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn list_versions_with_prefix(&self, prefix: &str) -> StoreResult<Vec<ObjectVersion>> {
        let objects = self.objects()?;
        let mut out = Vec::new();
        for (key, versions) in objects.iter().filter(|(k, _)| k.starts_with(prefix)) {
            let latest = versions.len().saturating_sub(1);
            // newest first, as S3 reports them
            for (idx, v) in versions.iter().enumerate().rev() {
                out.push(ObjectVersion {
                    key: key.clone(),
                    version_id: v.version_id.clone(),
                    last_modified: v.last_modified,
                    is_latest: idx == latest,
                });
            }
        }
        Ok(out)
    }

    async fn copy_version(
        &self,
        key: &str,
        source_version_id: &str,
    ) -> StoreResult<Option<String>> {
        let source = {
            let objects = self.objects()?;
            objects
                .get(key)
                .and_then(|versions| versions.iter().find(|v| v.version_id == source_version_id))
                .cloned()
                .ok_or_else(|| StoreError::not_found(key, Some(source_version_id)))?
        };
        let version_id = self.append(key, source.bytes, source.content_type)?;
        Ok(Some(version_id))
    }

    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> StoreResult<Option<String>> {
        let version_id = self.append(key, body, content_type.to_string())?;
        Ok(Some(version_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new("test-bucket");
        store
            .put("prompts/agent/system.txt", Bytes::from("v1 text"), "text/plain")
            .await
            .unwrap();
        store
            .put("prompts/agent/system.txt", Bytes::from("v2 text"), "text/plain")
            .await
            .unwrap();
        store
            .put("prompts/agent/system.txt.bak", Bytes::from("backup"), "text/plain")
            .await
            .unwrap();
        store
            .put("other/readme.md", Bytes::from("# hi"), "text/markdown")
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_fetch_latest_and_by_version() {
        let store = seeded().await;
        let versions = store.list_versions("prompts/agent/system.txt").await.unwrap();
        assert_eq!(versions.len(), 2);
        let oldest = versions.iter().find(|v| !v.is_latest).unwrap();

        let latest = store.fetch("prompts/agent/system.txt", None).await.unwrap();
        assert_eq!(latest.bytes, Bytes::from("v2 text"));

        let old = store
            .fetch("prompts/agent/system.txt", Some(&oldest.version_id))
            .await
            .unwrap();
        assert_eq!(old.bytes, Bytes::from("v1 text"));
        assert_eq!(old.content_type.as_deref(), Some("text/plain"));
    }

    #[tokio::test]
    async fn test_fetch_missing_is_not_found() {
        let store = seeded().await;
        let err = store.fetch("prompts/nope.txt", None).await.unwrap_err();
        assert!(err.is_not_found());

        let err = store
            .fetch("prompts/agent/system.txt", Some("no-such-version"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_list_keys_by_prefix() {
        let store = seeded().await;
        let keys = store.list_keys("prompts/").await.unwrap();
        assert_eq!(
            keys,
            vec!["prompts/agent/system.txt", "prompts/agent/system.txt.bak"]
        );
        assert!(store.list_keys("missing/").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_versions_filters_sibling_keys() {
        let store = seeded().await;
        let by_prefix = store
            .list_versions_with_prefix("prompts/agent/system.txt")
            .await
            .unwrap();
        assert_eq!(by_prefix.len(), 3);

        let exact = store.list_versions("prompts/agent/system.txt").await.unwrap();
        assert_eq!(exact.len(), 2);
        assert!(exact.iter().all(|v| v.key == "prompts/agent/system.txt"));
        assert_eq!(exact.iter().filter(|v| v.is_latest).count(), 1);
    }

    #[tokio::test]
    async fn test_copy_version_appends_new_latest() {
        let store = seeded().await;
        let key = "prompts/agent/system.txt";
        let before = store.list_versions(key).await.unwrap();
        let oldest = before.iter().find(|v| !v.is_latest).unwrap().clone();

        let new_id = store
            .copy_version(key, &oldest.version_id)
            .await
            .unwrap()
            .unwrap();
        assert_ne!(new_id, oldest.version_id);

        let after = store.list_versions(key).await.unwrap();
        assert_eq!(after.len(), before.len() + 1);
        let latest: Vec<_> = after.iter().filter(|v| v.is_latest).collect();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].version_id, new_id);

        let current = store.fetch(key, None).await.unwrap();
        assert_eq!(current.bytes, Bytes::from("v1 text"));
    }

    #[tokio::test]
    async fn test_copy_unknown_version_fails() {
        let store = seeded().await;
        let err = store
            .copy_version("prompts/agent/system.txt", "bogus")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(
            store
                .list_versions("prompts/agent/system.txt")
                .await
                .unwrap()
                .len(),
            2
        );
    }
}
