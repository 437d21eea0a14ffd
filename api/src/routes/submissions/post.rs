use crate::response::ApiResponse;
use crate::routes::common::{SubmissionResponse, rejection_response, service_error_response};
use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::submission_service::{CreateSubmission, FileUpload, SubmissionService};
use tracing::debug;
use util::state::AppState;

/// POST /api/submissions
///
/// Accepts the project-request form and stores it.
///
/// ### Request Body (Multipart Form Data)
/// - `id`, `planType`, `fullName`, `email` (required)
/// - `submittedAt`, `status`, `price`, `paymentId` (optional)
/// - free-text detail fields such as `title`, `skills`, `colorScheme`, `githubUsername`
/// - `seoOptimization`, `contactFormNeeded`, `blogSection`, `portfolioGallery` (`"true"` or anything else)
/// - `projects`, `experience`, `education` (JSON arrays as text)
/// - `resume` (file, optional)
/// - `uploadedFiles` (file, repeatable)
///
/// Unknown fields are ignored. Attachments that fail to upload are skipped.
///
/// ### Responses
///
/// - `201 Created`
/// ```json
/// {
///   "success": true,
///   "data": {
///     "id": "sub_1729330000",
///     "planType": "code",
///     "fullName": "Ada Lovelace",
///     "status": "pending",
///     "details": { "title": "Engineer", "seoOptimization": true },
///     "uploadedFiles": [{ "fileName": "logo.png", "url": "https://…", "provider": "s3" }]
///   },
///   "message": "Submission created successfully"
/// }
/// ```
///
/// - `400 Bad Request` (every violation is listed in `data`)
/// ```json
/// {
///   "success": false,
///   "data": [{ "field": "planType", "message": "Plan type must be one of: code, live" }],
///   "message": "Validation failed: planType: Plan type must be one of: code, live"
/// }
/// ```
///
/// - `403 Forbidden` (payment does not cover the plan)
/// - `404 Not Found` (payment id unknown)
/// - `413 Payload Too Large`
/// - `500 Internal Server Error`
/// ```json
/// { "success": false, "data": {}, "message": "Failed to save submission" }
/// ```
pub async fn create_submission(
    State(app_state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => return rejection_response(rejection.status(), rejection.body_text()),
    };
    let mut form = CreateSubmission::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return rejection_response(e.status(), e.body_text()),
        };
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "resume" | "uploadedFiles" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = match field.bytes().await {
                    Ok(bytes) => bytes,
                    Err(e) => return rejection_response(e.status(), e.body_text()),
                };
                // Browsers send an empty part for an untouched file input.
                if bytes.is_empty() {
                    continue;
                }

                let upload = FileUpload {
                    file_name,
                    content_type,
                    bytes,
                };
                if name == "resume" {
                    form.resume = Some(upload);
                } else {
                    form.uploaded_files.push(upload);
                }
            }
            _ => {
                let value = match field.text().await {
                    Ok(value) => value,
                    Err(e) => return rejection_response(e.status(), e.body_text()),
                };
                if !form.set_text_field(&name, value) {
                    debug!(field = %name, "Ignoring unknown form field");
                }
            }
        }
    }

    match SubmissionService::submit(app_state.db(), app_state.storage(), form).await {
        Ok(submission) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                SubmissionResponse::from(submission),
                "Submission created successfully",
            )),
        )
            .into_response(),
        Err(e) => service_error_response(e, "Failed to save submission"),
    }
}
