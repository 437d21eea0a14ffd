use crate::auth::extractors::AdminToken;
use crate::response::{ApiResponse, Empty};
use axum::{
    Json,
    body::Body,
    extract::FromRequestParts,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::warn;

/// Lets the request through only when it carries the admin bearer token.
///
/// Applied with `route_layer(from_fn(allow_admin))` so unmatched paths still 404.
pub async fn allow_admin(
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    let (mut parts, body) = req.into_parts();

    if let Err((status, reason)) = AdminToken::from_request_parts(&mut parts, &()).await {
        warn!(path = %parts.uri.path(), reason, "Rejected admin request");
        return Err((status, Json(ApiResponse::error("Admin access required"))));
    }

    Ok(next.run(Request::from_parts(parts, body)).await)
}
