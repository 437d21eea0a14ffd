use crate::config::AppConfig;
use crate::storage::{LocalObjectStore, ObjectStore};
use std::sync::Arc;
use tempfile::TempDir;

/// Creates a unique temporary directory and points `storage_root` at it.
/// The directory is removed when the returned `TempDir` is dropped.
///
/// Keep the returned `TempDir` in scope for as long as you need the files.
pub fn setup_test_storage_root() -> TempDir {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let abs = tmp
        .path()
        .canonicalize()
        .unwrap_or_else(|_| tmp.path().to_path_buf());
    AppConfig::set_storage_root(abs.to_string_lossy().to_string());
    tmp
}

/// A [`LocalObjectStore`] rooted in a fresh temporary directory.
pub fn test_object_store() -> (TempDir, Arc<dyn ObjectStore>) {
    let tmp = setup_test_storage_root();
    let store = LocalObjectStore::new(tmp.path(), "http://localhost:3000/files");
    (tmp, Arc::new(store))
}
