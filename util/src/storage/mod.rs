//! Object storage gateway.
//!
//! Every uploaded artefact (resumes, attachments, generated PDFs, generic
//! uploads) goes through an [`ObjectStore`]. Keys are laid out as
//! `<prefix>/<area>/<folder>/<token>-<file name>` so that everything belonging
//! to one submission can be listed and removed by folder. Submissions and
//! generic uploads live in separate [`Area`]s, so no submission id can name a
//! folder of generic uploads.
//!
//! Two backends exist:
//! - [`LocalObjectStore`] writes below `STORAGE_ROOT` and is served under `/files`.
//! - [`S3ObjectStore`] talks to any S3-compatible endpoint.

use crate::config::AppConfig;
use crate::paths::sanitize_segment;
use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

pub mod local;
pub mod s3;

pub use local::LocalObjectStore;
pub use s3::S3ObjectStore;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    #[error("Remote storage error: {0}")]
    Remote(String),

    #[error("Storage misconfigured: {0}")]
    Config(String),
}

/// Minimal blob-store contract. Keys are `/`-separated relative paths.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Short tag persisted next to every stored file (e.g. `local`, `s3`).
    fn provider(&self) -> &'static str;

    /// Store `bytes` under `key` and return the public URL.
    async fn put(&self, key: &str, content_type: &str, bytes: Bytes) -> Result<String, StorageError>;

    /// All keys starting with `prefix`.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError>;

    /// Remove a single object. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// Result of a successful upload, as handed back to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredObject {
    pub key: String,
    pub file_name: String,
    pub url: String,
    pub download_url: String,
    pub provider: String,
    pub content_type: String,
    pub size: u64,
}

impl StoredObject {
    /// Lower-cased file extension, if any (`"pdf"`, `"docx"`, ...).
    pub fn format(&self) -> Option<String> {
        std::path::Path::new(&self.file_name)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
    }
}

/// Outcome of a best-effort folder removal.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FolderCleanup {
    pub deleted: usize,
    /// Keys (or the folder prefix itself when listing failed) that could not be removed.
    pub failed: Vec<String>,
}

/// Top-level namespace below the key prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    /// One folder per submission id.
    Submissions,
    /// Folders chosen by `/upload` callers.
    Uploads,
}

impl Area {
    pub fn as_str(self) -> &'static str {
        match self {
            Area::Submissions => "submissions",
            Area::Uploads => "uploads",
        }
    }
}

/// `<prefix>/<area>/<folder>/`
pub fn folder_prefix(prefix: &str, area: Area, folder: &str) -> String {
    format!(
        "{}/{}/{}/",
        prefix.trim_matches('/'),
        area.as_str(),
        sanitize_segment(folder, "default")
    )
}

/// `<prefix>/<area>/<folder>/<token>-<file name>`; the random token keeps two
/// attachments with the same name from overwriting each other.
pub fn object_key(prefix: &str, area: Area, folder: &str, file_name: &str) -> String {
    let token = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{}{}-{}",
        folder_prefix(prefix, area, folder),
        &token[..8],
        sanitize_segment(file_name, "untitled")
    )
}

/// Best guess at a MIME type: the declared one unless it is missing or generic.
pub fn content_type_for(file_name: &str, declared: Option<&str>) -> String {
    match declared {
        Some(ct) if !ct.is_empty() && ct != "application/octet-stream" => ct.to_string(),
        _ => mime_guess::from_path(file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string(),
    }
}

/// Upload one file into `area`/`folder` using the configured key prefix.
pub async fn upload_file(
    store: &dyn ObjectStore,
    area: Area,
    folder: &str,
    file_name: &str,
    content_type: &str,
    bytes: Bytes,
) -> Result<StoredObject, StorageError> {
    let prefix = AppConfig::global().storage_prefix.clone();
    let key = object_key(&prefix, area, folder, file_name);
    let size = bytes.len() as u64;

    let url = store.put(&key, content_type, bytes).await?;
    debug!(key = %key, size, provider = store.provider(), "Stored object");

    Ok(StoredObject {
        key,
        file_name: file_name.to_string(),
        download_url: url.clone(),
        url,
        provider: store.provider().to_string(),
        content_type: content_type.to_string(),
        size,
    })
}

/// Delete every object stored under `area`/`folder`.
///
/// Never fails: listing or per-object errors are logged and reported in the
/// returned [`FolderCleanup`].
pub async fn delete_folder(store: &dyn ObjectStore, area: Area, folder: &str) -> FolderCleanup {
    let prefix = folder_prefix(&AppConfig::global().storage_prefix.clone(), area, folder);
    let mut cleanup = FolderCleanup::default();

    let keys = match store.list(&prefix).await {
        Ok(keys) => keys,
        Err(e) => {
            warn!(prefix = %prefix, error = %e, "Failed to list stored objects");
            cleanup.failed.push(prefix);
            return cleanup;
        }
    };

    for key in keys {
        match store.delete(&key).await {
            Ok(()) => cleanup.deleted += 1,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to delete stored object");
                cleanup.failed.push(key);
            }
        }
    }

    cleanup
}

/// Build the object store selected by `STORAGE_BACKEND`.
pub async fn from_config(config: &AppConfig) -> Result<Arc<dyn ObjectStore>, StorageError> {
    match config.storage_backend.as_str() {
        "local" => Ok(Arc::new(LocalObjectStore::new(
            crate::paths::absolutize(&config.storage_root),
            config.storage_public_base_url.clone(),
        ))),
        "s3" => {
            if config.s3_bucket.is_empty() {
                return Err(StorageError::Config("S3_BUCKET is required for the s3 backend".into()));
            }
            let store = S3ObjectStore::connect(
                config.s3_bucket.clone(),
                config.s3_endpoint.clone(),
                config.s3_public_base_url.clone(),
            )
            .await;
            Ok(Arc::new(store))
        }
        other => Err(StorageError::Config(format!(
            "Unknown STORAGE_BACKEND '{other}' (expected 'local' or 's3')"
        ))),
    }
}
