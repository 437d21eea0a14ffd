//! Application state container shared across Axum route handlers.
//!
//! Holds the database connection and the object store. It is cheap to clone
//! and is handed to handlers through Axum's `State<T>` extractor.

use crate::storage::ObjectStore;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Central application state shared across the server.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    storage: Arc<dyn ObjectStore>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, storage: Arc<dyn ObjectStore>) -> Self {
        Self { db, storage }
    }

    /// Returns a shared reference to the internal `DatabaseConnection`.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Returns the configured object store.
    pub fn storage(&self) -> &dyn ObjectStore {
        self.storage.as_ref()
    }
}
