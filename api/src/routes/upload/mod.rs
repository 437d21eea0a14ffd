pub mod post;

use crate::auth::middleware::enforce_content_length;
use axum::{
    Router, extract::DefaultBodyLimit, middleware::from_fn_with_state, routing::post,
};
use post::upload_file;
use util::{config::AppConfig, state::AppState};

/// Builds the `/upload` route group.
///
/// - `POST /upload` → `upload_file`, capped by `MAX_UPLOAD_BODY_BYTES`
pub fn upload_routes() -> Router<AppState> {
    let limit = AppConfig::global().max_upload_body_bytes;

    Router::new().route(
        "/",
        post(upload_file)
            .layer(DefaultBodyLimit::max(limit))
            .layer(from_fn_with_state(limit, enforce_content_length)),
    )
}
