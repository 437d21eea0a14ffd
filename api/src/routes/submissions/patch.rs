use crate::response::ApiResponse;
use crate::routes::common::{SubmissionResponse, rejection_response, service_error_response};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::submission_service::{SubmissionService, UpdateSubmission};
use util::state::AppState;

/// PATCH /api/submissions/{id}
///
/// Partial update by an admin. Only the fields present are changed; `details`
/// is merged field by field into the stored object.
///
/// ### Request Body
/// ```json
/// {
///   "status": "in-progress",
///   "price": "1499.50",
///   "details": { "colorScheme": "dark" }
/// }
/// ```
/// `price` may be a number or a numeric string.
///
/// ### Responses
/// - `200 OK` with the updated submission
/// - `400 Bad Request` (violations in `data`, or an unreadable body)
/// - `401 Unauthorized`
/// - `404 Not Found`
/// - `413 Payload Too Large`
pub async fn update_submission(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateSubmission>, JsonRejection>,
) -> Response {
    let Json(patch) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection.status(), rejection.body_text()),
    };

    match SubmissionService::update(app_state.db(), &id, patch).await {
        Ok(updated) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                SubmissionResponse::from(updated),
                "Submission updated successfully",
            )),
        )
            .into_response(),
        Err(e) => service_error_response(e, "Failed to update submission"),
    }
}
