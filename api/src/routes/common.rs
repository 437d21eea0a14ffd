//! Response shapes and error mapping shared by the route groups.

use crate::response::{ApiResponse, Empty};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use common::FieldViolation;
use db::models::{
    payment::Model as Payment,
    submission::{Model as Submission, StoredFile, SubmissionDetails},
};
use serde::Serialize;
use services::{DenyReason, ServiceError};
use tracing::error;

/// Converts a service failure into the HTTP response the client sees.
///
/// Validation and lookup failures are reported verbatim. Storage and upstream
/// failures are logged with their detail and answered with `failure_msg`.
pub fn service_error_response(err: ServiceError, failure_msg: &str) -> Response {
    let message = err.to_string();
    match err {
        ServiceError::Validation(violations) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Vec<FieldViolation>>::failure(violations, message)),
        )
            .into_response(),
        ServiceError::NotFound(message) => {
            (StatusCode::NOT_FOUND, Json(ApiResponse::<Empty>::error(message))).into_response()
        }
        ServiceError::PayloadTooLarge { .. } => (
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(ApiResponse::<Empty>::error(message)),
        )
            .into_response(),
        ServiceError::AccessDenied(reason) => {
            let status = match reason {
                DenyReason::NotFound => StatusCode::NOT_FOUND,
                DenyReason::PlanMismatch => StatusCode::FORBIDDEN,
            };
            (status, Json(ApiResponse::<Empty>::error(reason.message()))).into_response()
        }
        ServiceError::Storage(detail) => {
            error!(error = %detail, "{failure_msg}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error(failure_msg)),
            )
                .into_response()
        }
        ServiceError::Upstream(detail) => {
            error!(error = %detail, "{failure_msg}");
            (
                StatusCode::BAD_GATEWAY,
                Json(ApiResponse::<Empty>::error(failure_msg)),
            )
                .into_response()
        }
    }
}

/// A 400 with a plain message, for malformed requests the services never see.
pub fn bad_request(message: impl Into<String>) -> Response {
    (StatusCode::BAD_REQUEST, Json(ApiResponse::<Empty>::error(message))).into_response()
}

/// Answers a body the extractor could not read (bad multipart, bad JSON, over the body limit).
pub fn rejection_response(status: StatusCode, detail: String) -> Response {
    (status, Json(ApiResponse::<Empty>::error(detail))).into_response()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub id: String,
    pub plan_type: String,
    pub full_name: String,
    pub email: String,
    pub submitted_at: String,
    pub status: String,
    pub price: Option<f64>,
    pub details: SubmissionDetails,
    pub resume: Option<StoredFile>,
    pub uploaded_files: Vec<StoredFile>,
    pub pdf: Option<StoredFile>,
    pub payment_id: Option<String>,
    pub payment_date: Option<String>,
    pub payer_name: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Submission> for SubmissionResponse {
    fn from(s: Submission) -> Self {
        Self {
            id: s.id,
            plan_type: s.plan_type.to_string(),
            full_name: s.full_name,
            email: s.email,
            submitted_at: s.submitted_at,
            status: s.status.to_string(),
            price: s.price,
            details: s.details,
            resume: s.resume,
            uploaded_files: s.uploaded_files.0,
            pdf: s.pdf,
            payment_id: s.payment_id,
            payment_date: s.payment_date.map(|d| d.to_rfc3339()),
            payer_name: s.payer_name,
            created_at: s.created_at.to_rfc3339(),
            updated_at: s.updated_at.to_rfc3339(),
        }
    }
}

/// What `/payments/verify` tells the client about a payment that unlocks a plan.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    pub id: String,
    pub plan: String,
    pub date: DateTime<Utc>,
    pub user_name: Option<String>,
    pub amount: f64,
    pub transaction_id: Option<String>,
    pub status: String,
}

impl From<Payment> for PaymentDetails {
    fn from(p: Payment) -> Self {
        Self {
            id: p.id,
            plan: p.plan.to_string(),
            date: p.payment_date,
            user_name: p.user_name,
            amount: p.amount,
            transaction_id: p.transaction_id,
            status: p.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_of(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_lists_every_violation() {
        let err = ServiceError::Validation(vec![
            FieldViolation::new("email", "Invalid email format"),
            FieldViolation::new("planType", "Plan type must be one of: code, live"),
        ]);
        let response = service_error_response(err, "unused");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_of(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["data"][1]["field"], "planType");
        assert!(json["message"].as_str().unwrap().contains("email: Invalid email format"));
    }

    #[tokio::test]
    async fn storage_detail_is_not_leaked() {
        let err = ServiceError::Storage("disk I/O error at /var/lib".into());
        let response = service_error_response(err, "Failed to process payment");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_of(response).await;
        assert_eq!(json["message"], "Failed to process payment");
    }

    #[tokio::test]
    async fn gate_denials_map_to_403_and_404() {
        let mismatch = service_error_response(
            ServiceError::AccessDenied(DenyReason::PlanMismatch),
            "unused",
        );
        assert_eq!(mismatch.status(), StatusCode::FORBIDDEN);

        let unknown =
            service_error_response(ServiceError::AccessDenied(DenyReason::NotFound), "unused");
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_of(unknown).await["message"], "Payment not found");
    }

    #[tokio::test]
    async fn upstream_is_bad_gateway() {
        let response =
            service_error_response(ServiceError::Upstream("timeout".into()), "Upload failed");
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
