use crate::response::ApiResponse;
use crate::routes::common::{bad_request, rejection_response, service_error_response};
use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::Serialize;
use services::{ServiceError, validation::validate_submission_id};
use tracing::info;
use util::{
    state::AppState,
    storage::{self, Area},
};

const DEFAULT_FOLDER: &str = "uploads";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub url: String,
    pub public_id: String,
    pub format: Option<String>,
    pub download_url: String,
}

/// POST /api/upload
///
/// Stores a single file in the object store.
///
/// ### Request Body (Multipart Form Data)
/// - `file` (file, required)
/// - `folderId` (string, optional): target folder, `uploads` when omitted
///
/// ### Responses
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "data": {
///     "url": "https://bucket.s3.amazonaws.com/builtwithme/uploads/1a2b3c4d-logo.png",
///     "publicId": "builtwithme/uploads/1a2b3c4d-logo.png",
///     "format": "png",
///     "downloadUrl": "https://bucket.s3.amazonaws.com/builtwithme/uploads/1a2b3c4d-logo.png"
///   },
///   "message": "File uploaded successfully"
/// }
/// ```
/// - `400 Bad Request` (`No file provided`, or an invalid `folderId`)
/// - `413 Payload Too Large`
/// - `502 Bad Gateway`
/// ```json
/// { "success": false, "data": {}, "message": "Upload failed" }
/// ```
pub async fn upload_file(
    State(app_state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => return rejection_response(rejection.status(), rejection.body_text()),
    };

    let mut folder: Option<String> = None;
    let mut file: Option<(String, String, Bytes)> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return rejection_response(e.status(), e.body_text()),
        };

        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                match field.bytes().await {
                    Ok(bytes) if !bytes.is_empty() => file = Some((file_name, content_type, bytes)),
                    Ok(_) => {}
                    Err(e) => return rejection_response(e.status(), e.body_text()),
                }
            }
            "folderId" => match field.text().await {
                Ok(text) if !text.trim().is_empty() => folder = Some(text.trim().to_string()),
                Ok(_) => {}
                Err(e) => return rejection_response(e.status(), e.body_text()),
            },
            _ => continue,
        }
    }

    let Some((file_name, content_type, bytes)) = file else {
        return bad_request("No file provided");
    };
    let folder = folder.unwrap_or_else(|| DEFAULT_FOLDER.to_string());
    if validate_submission_id(&folder).is_err() {
        return service_error_response(
            ServiceError::invalid(
                "folderId",
                "Folder id may only contain letters, digits, '-' and '_' (max 64 characters)",
            ),
            "Upload failed",
        );
    }

    let content_type = storage::content_type_for(&file_name, Some(&content_type));
    let upload = storage::upload_file(
        app_state.storage(),
        Area::Uploads,
        &folder,
        &file_name,
        &content_type,
        bytes,
    );
    match upload.await {
        Ok(stored) => {
            info!(key = %stored.key, size = stored.size, "File uploaded");
            let format = stored.format();
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    UploadedFile {
                        url: stored.url,
                        public_id: stored.key,
                        format,
                        download_url: stored.download_url,
                    },
                    "File uploaded successfully",
                )),
            )
                .into_response()
        }
        Err(e) => service_error_response(e.into(), "Upload failed"),
    }
}
