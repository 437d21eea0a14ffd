use crate::response::{ApiResponse, Empty};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::error;
use util::state::AppState;

/// Builds the `/health` route group.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

/// GET /health
///
/// Liveness probe. Also pings the database so a broken connection shows up
/// in uptime checks.
///
/// ### Responses
/// - `200 OK`
/// ```json
/// { "success": true, "data": "OK", "message": "Health check passed" }
/// ```
/// - `503 Service Unavailable`
/// ```json
/// { "success": false, "data": {}, "message": "Database unavailable" }
/// ```
async fn health_check(State(app_state): State<AppState>) -> Response {
    match app_state.db().ping().await {
        Ok(()) => Json(ApiResponse::success("OK", "Health check passed")).into_response(),
        Err(e) => {
            error!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::<Empty>::error("Database unavailable")),
            )
                .into_response()
        }
    }
}
