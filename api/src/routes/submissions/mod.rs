//! # Submissions Routes
//!
//! - `POST /submissions` → `create_submission` (public intake form)
//! - `GET /submissions` → `list_submissions` (admin)
//! - `GET /submissions/{id}` → `get_submission` (admin)
//! - `PATCH /submissions/{id}` → `update_submission` (admin)
//! - `DELETE /submissions/{id}` → `delete_submission` (admin)
//!
//! Body caps come from `MAX_CREATE_BODY_BYTES` and `MAX_UPDATE_BODY_BYTES`. The
//! declared `Content-Length` is checked first; `DefaultBodyLimit` covers
//! bodies streamed without one.

pub mod delete;
pub mod get;
pub mod patch;
pub mod post;

use crate::auth::{guards::allow_admin, middleware::enforce_content_length};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use delete::delete_submission;
use get::{get_submission, list_submissions};
use patch::update_submission;
use post::create_submission;
use util::{config::AppConfig, state::AppState};

pub fn submissions_routes() -> Router<AppState> {
    let (create_limit, update_limit) = {
        let config = AppConfig::global();
        (config.max_create_body_bytes, config.max_update_body_bytes)
    };

    Router::new()
        .route(
            "/",
            post(create_submission)
                .layer(DefaultBodyLimit::max(create_limit))
                .layer(from_fn_with_state(create_limit, enforce_content_length))
                .merge(get(list_submissions).route_layer(from_fn(allow_admin))),
        )
        .route(
            "/{id}",
            get(get_submission)
                .patch(update_submission)
                .delete(delete_submission)
                .layer(DefaultBodyLimit::max(update_limit))
                .layer(from_fn_with_state(update_limit, enforce_content_length))
                .route_layer(from_fn(allow_admin)),
        )
}
