use super::{ObjectStore, StorageError};
use crate::paths::object_path;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Stores objects as plain files below a root directory.
///
/// Public URLs are `<public_base_url>/<key>`; the API serves that tree under `/files`.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        object_path(&self.root, key).ok_or_else(|| StorageError::InvalidKey(key.to_string()))
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url.trim_end_matches('/'), key)
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    fn provider(&self) -> &'static str {
        "local"
    }

    async fn put(&self, key: &str, _content_type: &str, bytes: Bytes) -> Result<String, StorageError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &bytes).await?;
        Ok(self.url_for(key))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let dir = self.path_for(prefix.trim_end_matches('/'))?;
        let root = self.root.clone();

        let keys = tokio::task::spawn_blocking(move || {
            if !dir.is_dir() {
                return Vec::new();
            }
            WalkDir::new(&dir)
                .into_iter()
                .filter_map(Result::ok)
                .filter(|entry| entry.file_type().is_file())
                .filter_map(|entry| {
                    entry.path().strip_prefix(&root).ok().map(|rel| {
                        rel.components()
                            .map(|c| c.as_os_str().to_string_lossy().into_owned())
                            .collect::<Vec<_>>()
                            .join("/")
                    })
                })
                .collect::<Vec<_>>()
        })
        .await
        .map_err(|e| StorageError::Remote(format!("listing task failed: {e}")))?;

        Ok(keys)
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        }

        // Drop the folder once its last object is gone; fails harmlessly while non-empty.
        if let Some(parent) = path.parent() {
            if parent != self.root {
                let _ = tokio::fs::remove_dir(parent).await;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn put_list_delete_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = LocalObjectStore::new(tmp.path(), "http://localhost:3000/files/");

        let url = store
            .put("bwm/sub-1/aa-cv.pdf", "application/pdf", Bytes::from_static(b"%PDF"))
            .await
            .unwrap();
        assert_eq!(url, "http://localhost:3000/files/bwm/sub-1/aa-cv.pdf");

        store
            .put("bwm/sub-1/bb-photo.png", "image/png", Bytes::from_static(b"png"))
            .await
            .unwrap();
        store
            .put("bwm/sub-2/cc-other.txt", "text/plain", Bytes::from_static(b"x"))
            .await
            .unwrap();

        let mut keys = store.list("bwm/sub-1/").await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["bwm/sub-1/aa-cv.pdf", "bwm/sub-1/bb-photo.png"]);

        for key in &keys {
            store.delete(key).await.unwrap();
        }
        assert!(store.list("bwm/sub-1/").await.unwrap().is_empty());
        assert!(!tmp.path().join("bwm/sub-1").exists());
        assert_eq!(store.list("bwm/sub-2/").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_folder_lists_empty_and_missing_key_deletes_ok() {
        let tmp = TempDir::new().unwrap();
        let store = LocalObjectStore::new(tmp.path(), "http://x");

        assert!(store.list("bwm/nothing/").await.unwrap().is_empty());
        assert!(store.delete("bwm/nothing/file.txt").await.is_ok());
    }

    #[tokio::test]
    async fn traversal_keys_are_rejected() {
        let tmp = TempDir::new().unwrap();
        let store = LocalObjectStore::new(tmp.path(), "http://x");

        let err = store
            .put("../escape.txt", "text/plain", Bytes::from_static(b"x"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }
}
