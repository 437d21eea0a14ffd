use crate::response::ApiResponse;
use crate::routes::common::service_error_response;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use services::submission_service::SubmissionService;
use util::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedSubmission {
    pub id: String,
    pub files_deleted: usize,
    /// Stored objects that could not be removed and were left behind.
    pub files_failed: usize,
}

/// DELETE /api/submissions/{id}
///
/// Removes the record, then its stored files. A file that cannot be removed
/// does not fail the request.
///
/// ### Responses
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "data": { "id": "sub_1", "filesDeleted": 3, "filesFailed": 0 },
///   "message": "Submission deleted successfully"
/// }
/// ```
/// - `401 Unauthorized`
/// - `404 Not Found`
pub async fn delete_submission(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match SubmissionService::delete(app_state.db(), app_state.storage(), &id).await {
        Ok(cleanup) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                DeletedSubmission {
                    id,
                    files_deleted: cleanup.deleted,
                    files_failed: cleanup.failed.len(),
                },
                "Submission deleted successfully",
            )),
        )
            .into_response(),
        Err(e) => service_error_response(e, "Failed to delete submission"),
    }
}
