//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → liveness (public)
//! - `/submissions` → intake form (public `POST`) and triage (admin)
//! - `/payments` → payment recording and verification (public)
//! - `/upload` → single-file upload to the object store (public)

use crate::routes::{
    health::health_routes, payments::payments_routes, submissions::submissions_routes,
    upload::upload_routes,
};
use axum::Router;
use util::state::AppState;

pub mod common;
pub mod health;
pub mod payments;
pub mod submissions;
pub mod upload;

/// Builds the complete `/api` router.
///
/// Body limits are read from `AppConfig` here, so configuration overrides
/// must be in place before this is called.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/submissions", submissions_routes())
        .nest("/payments", payments_routes())
        .nest("/upload", upload_routes())
        .with_state(app_state)
}
