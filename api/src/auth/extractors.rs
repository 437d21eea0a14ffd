use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use axum_extra::extract::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use util::config::AppConfig;

/// Proof that the request carried the configured admin bearer token.
///
/// # Errors
/// - `401 Unauthorized` when the header is missing or malformed, when the
///   token does not match `ADMIN_TOKEN`, or when no admin token is configured.
///
/// # Example
/// ```ignore
/// async fn list_everything(_admin: AdminToken) -> impl IntoResponse {
///     // only reached with a valid token
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AdminToken;

impl<S> FromRequestParts<S> for AdminToken
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| (StatusCode::UNAUTHORIZED, "Missing or invalid Authorization header"))?;

        let expected = AppConfig::global().admin_token.clone();
        if expected.is_empty() {
            return Err((StatusCode::UNAUTHORIZED, "Admin access is not configured"));
        }

        if tokens_match(bearer.token(), &expected) {
            Ok(AdminToken)
        } else {
            Err((StatusCode::UNAUTHORIZED, "Invalid admin token"))
        }
    }
}

/// Length-independent comparison of two tokens.
fn tokens_match(given: &str, expected: &str) -> bool {
    let (a, b) = (given.as_bytes(), expected.as_bytes());
    let mut diff = a.len() ^ b.len();
    for i in 0..a.len().max(b.len()) {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        diff |= usize::from(x ^ y);
    }
    diff == 0
}
