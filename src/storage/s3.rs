//! AWS S3 backend for [`VersionedStore`].
//!
//! Requires a bucket with versioning enabled. Listing calls follow pagination
//! to completion; all SDK errors are logged once here and converted to
//! [`StoreError`].
use std::sync::Arc;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    Client,
    error::{DisplayErrorContext, ProvideErrorMetadata, SdkError},
    primitives::ByteStream,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use super::{ObjectVersion, StoredObject, VersionedStore};
use crate::{
    config::StoreConfig,
    error::{StoreError, StoreResult},
};

/// Characters left as-is in a `CopySource` value; `/` keeps the key hierarchy.
const COPY_SOURCE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Error codes S3 uses for a missing key or version. `NotFound` is what
/// HEAD requests report, since they carry no error body.
const NOT_FOUND_CODES: [&str; 3] = ["NoSuchKey", "NoSuchVersion", "NotFound"];

/// S3 rejects a version id it cannot parse with this code instead of
/// `NoSuchVersion`.
const INVALID_ARGUMENT: &str = "InvalidArgument";

#[derive(Clone, Debug)]
pub struct S3Store {
    client: Arc<Client>,
    bucket: String,
}

impl S3Store {
    /// Build the SDK configuration from `config` and create the client.
    pub async fn connect(config: &StoreConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));
        if let Some(creds) = &config.credentials {
            loader = loader.credentials_provider(Credentials::from_keys(
                creds.access_key_id.clone(),
                creds.secret_access_key.clone(),
                None,
            ));
        }
        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;
        Self::new(&sdk_config, config)
    }

    /// Create the client from an already loaded SDK configuration.
    pub fn new(sdk_config: &SdkConfig, config: &StoreConfig) -> Self {
        let mut s3_config_builder = aws_sdk_s3::config::Builder::from(sdk_config);
        if config.endpoint_url.is_some() {
            // S3-compatible servers rarely support virtual-hosted buckets
            s3_config_builder = s3_config_builder.force_path_style(true);
        }
        let client = Client::from_conf(s3_config_builder.build());
        Self::from_client(client, config.bucket.clone())
    }

    pub fn from_client(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client: Arc::new(client),
            bucket: bucket.into(),
        }
    }
}

/// `bucket/key?versionId=...`, URL-encoded as CopyObject expects.
fn copy_source(bucket: &str, key: &str, version_id: &str) -> String {
    format!(
        "{}/{}?versionId={}",
        bucket,
        utf8_percent_encode(key, COPY_SOURCE_SET),
        utf8_percent_encode(version_id, COPY_SOURCE_SET)
    )
}

/// Map an error from a key/version lookup, keeping "missing" distinct.
fn lookup_error<E>(err: SdkError<E>, op: &str, key: &str, version_id: Option<&str>) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    let code = err.as_service_error().and_then(|e| e.code());
    let status = err.raw_response().map(|resp| resp.status().as_u16());

    if is_missing(code, status, version_id) {
        tracing::debug!(key, ?version_id, ?code, "{op}: not found");
        return StoreError::not_found(key, version_id);
    }
    backend_error(err, op, key)
}

/// Whether a failed lookup means the key or version does not exist.
///
/// The error code decides whenever there is one, so `NoSuchBucket` (also a 404)
/// stays a backend failure. A bare 404 only counts when no code came back.
fn is_missing(code: Option<&str>, status: Option<u16>, version_id: Option<&str>) -> bool {
    match code {
        Some(code) if NOT_FOUND_CODES.contains(&code) => true,
        Some(INVALID_ARGUMENT) => version_id.is_some(),
        Some(_) => false,
        None => status == Some(404),
    }
}

fn backend_error<E>(err: SdkError<E>, op: &str, resource: &str) -> StoreError
where
    E: std::error::Error + 'static,
{
    let message = DisplayErrorContext(&err).to_string();
    tracing::error!(resource, "{op} failed: {message}");
    StoreError::Backend(format!("{op} '{resource}': {message}"))
}

fn to_utc(ts: Option<&aws_sdk_s3::primitives::DateTime>) -> DateTime<Utc> {
    ts.and_then(|t| DateTime::<Utc>::from_timestamp(t.secs(), t.subsec_nanos()))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

#[async_trait]
impl VersionedStore for S3Store {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn fetch(&self, key: &str, version_id: Option<&str>) -> StoreResult<StoredObject> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .set_version_id(version_id.map(str::to_owned))
            .send()
            .await
            .map_err(|e| lookup_error(e, "GetObject", key, version_id))?;

        let content_type = output.content_type().map(str::to_owned);
        let fetched_version = output.version_id().map(str::to_owned);
        let data = output.body.collect().await.map_err(|e| {
            tracing::error!(key, "GetObject body stream failed: {e}");
            StoreError::Backend(format!("GetObject '{key}': failed to stream object: {e}"))
        })?;

        Ok(StoredObject {
            bytes: data.into_bytes(),
            content_type,
            version_id: fetched_version,
        })
    }

    async fn list_keys(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let mut keys = Vec::new();
        let mut continuation: Option<String> = None;
        loop {
            let page = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix)
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(|e| backend_error(e, "ListObjectsV2", prefix))?;

            keys.extend(
                page.contents()
                    .iter()
                    .filter_map(|obj| obj.key().map(str::to_owned)),
            );

            match page.next_continuation_token() {
                Some(token) if page.is_truncated().unwrap_or(false) => {
                    continuation = Some(token.to_owned());
                }
                _ => break,
            }
        }
        tracing::debug!(prefix, count = keys.len(), "listed keys");
        Ok(keys)
    }

    async fn list_versions_with_prefix(&self, prefix: &str) -> StoreResult<Vec<ObjectVersion>> {
        let mut versions = Vec::new();
        let mut key_marker: Option<String> = None;
        let mut version_marker: Option<String> = None;
        loop {
            let page = self
                .client
                .list_object_versions()
                .bucket(&self.bucket)
                .prefix(prefix)
                .set_key_marker(key_marker.take())
                .set_version_id_marker(version_marker.take())
                .send()
                .await
                .map_err(|e| backend_error(e, "ListObjectVersions", prefix))?;

            for v in page.versions() {
                let (Some(key), Some(version_id)) = (v.key(), v.version_id()) else {
                    tracing::warn!("skipping version entry without key or version id");
                    continue;
                };
                versions.push(ObjectVersion {
                    key: key.to_owned(),
                    version_id: version_id.to_owned(),
                    last_modified: to_utc(v.last_modified()),
                    is_latest: v.is_latest().unwrap_or(false),
                });
            }

            if !page.is_truncated().unwrap_or(false) {
                break;
            }
            key_marker = page.next_key_marker().map(str::to_owned);
            version_marker = page.next_version_id_marker().map(str::to_owned);
            if key_marker.is_none() {
                break;
            }
        }
        tracing::debug!(prefix, count = versions.len(), "listed versions");
        Ok(versions)
    }

    async fn copy_version(
        &self,
        key: &str,
        source_version_id: &str,
    ) -> StoreResult<Option<String>> {
        let output = self
            .client
            .copy_object()
            .bucket(&self.bucket)
            .key(key)
            .copy_source(copy_source(&self.bucket, key, source_version_id))
            .send()
            .await
            .map_err(|e| lookup_error(e, "CopyObject", key, Some(source_version_id)))?;

        let new_version = output.version_id().map(str::to_owned);
        tracing::info!(key, source_version_id, ?new_version, "copied version onto key");
        Ok(new_version)
    }

    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> StoreResult<Option<String>> {
        let size = body.len();
        let output = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| backend_error(e, "PutObject", key))?;

        let version = output.version_id().map(str::to_owned);
        tracing::info!(key, size, ?version, "stored object");
        Ok(version)
    }
}
