use api::routes::routes;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
    response::Response,
};
use db::test_utils::setup_test_db;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use std::convert::Infallible;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use tower::util::BoxCloneService;
use util::{
    config::AppConfig, state::AppState, storage::ObjectStore, test_helpers::test_object_store,
};

pub const ADMIN_TOKEN: &str = "test-admin-token";

pub struct TestApp {
    pub service: BoxCloneService<Request<Body>, Response, Infallible>,
    pub db: DatabaseConnection,
    /// Keeps the local storage root alive for the test's duration.
    pub storage_root: Option<TempDir>,
}

impl TestApp {
    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let response = self.service.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }
}

fn reset_config() {
    AppConfig::reset();
    AppConfig::set_admin_token(ADMIN_TOKEN);
}

fn build(db: DatabaseConnection, store: Arc<dyn ObjectStore>) -> BoxCloneService<Request<Body>, Response, Infallible> {
    let router = Router::new().nest("/api", routes(AppState::new(db, store)));
    router.into_service().boxed_clone()
}

/// Fresh in-memory database and a local object store in a temp directory.
///
/// Resets the global config, so callers must be `#[serial]`.
pub async fn make_test_app() -> TestApp {
    reset_config();
    let db = setup_test_db().await;
    let (tmp, store) = test_object_store();

    TestApp {
        service: build(db.clone(), store),
        db,
        storage_root: Some(tmp),
    }
}

/// Like [`make_test_app`] but with a caller-supplied object store.
pub async fn make_test_app_with_store(store: Arc<dyn ObjectStore>) -> TestApp {
    reset_config();
    let db = setup_test_db().await;

    TestApp {
        service: build(db.clone(), store),
        db,
        storage_root: None,
    }
}
