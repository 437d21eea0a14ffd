use crate::response::ApiResponse;
use crate::routes::common::{SubmissionResponse, service_error_response};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::submission_service::{ListSubmissions, SubmissionService};
use util::state::AppState;

/// GET /api/submissions
///
/// Submissions, newest first. Admin only.
///
/// ### Query Parameters
/// - `status` (optional): exact status, e.g. `in-progress`
/// - `planType` (optional): `code` or `live`
/// - `query` (optional): case-insensitive partial match on name, email or id
///
/// Blank values and `all` are ignored.
///
/// ### Examples
/// ```http
/// GET /api/submissions?status=pending
/// GET /api/submissions?planType=live&query=hopper
/// ```
///
/// ### Responses
/// - `200 OK` with `data` as an array of submissions
/// - `400 Bad Request` (unknown status or plan type)
/// - `401 Unauthorized`
/// - `500 Internal Server Error`
pub async fn list_submissions(
    State(app_state): State<AppState>,
    Query(query): Query<ListSubmissions>,
) -> Response {
    match SubmissionService::list(app_state.db(), query).await {
        Ok(submissions) => {
            let data: Vec<SubmissionResponse> =
                submissions.into_iter().map(SubmissionResponse::from).collect();
            (
                StatusCode::OK,
                Json(ApiResponse::success(data, "Submissions retrieved successfully")),
            )
                .into_response()
        }
        Err(e) => service_error_response(e, "Failed to retrieve submissions"),
    }
}

/// GET /api/submissions/{id}
///
/// ### Responses
/// - `200 OK` with the submission in `data`
/// - `401 Unauthorized`
/// - `404 Not Found`
/// ```json
/// { "success": false, "data": {}, "message": "Submission not found" }
/// ```
pub async fn get_submission(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match SubmissionService::find(app_state.db(), &id).await {
        Ok(submission) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                SubmissionResponse::from(submission),
                "Submission retrieved successfully",
            )),
        )
            .into_response(),
        Err(e) => service_error_response(e, "Failed to retrieve submission"),
    }
}
