use crate::response::ApiResponse;
use crate::routes::common::{rejection_response, service_error_response};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use services::payment_service::{CreatePayment, PaymentService};
use util::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedPayment {
    pub payment_id: String,
    pub duplicate: bool,
}

/// POST /api/payments/create
///
/// Records a payment confirmation. Repeated claims are collapsed onto the
/// existing record: first by `transactionId`, then by identical plan, amount
/// and `userName` inside the duplicate window (30 minutes by default).
///
/// ### Request Body
/// ```json
/// {
///   "plan": "code",
///   "status": "completed",
///   "amount": 2500,
///   "userName": "Alice",
///   "paymentMethod": "qr",
///   "transactionId": "TX-1029",
///   "paymentDate": "2025-10-19T09:30:00Z"
/// }
/// ```
///
/// ### Responses
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "data": { "paymentId": "5c1fd1e2-…", "duplicate": false },
///   "message": "Payment data saved successfully"
/// }
/// ```
/// - `400 Bad Request` (violations in `data`)
/// - `500 Internal Server Error`
/// ```json
/// { "success": false, "data": {}, "message": "Failed to process payment" }
/// ```
pub async fn create_payment(
    State(app_state): State<AppState>,
    payload: Result<Json<CreatePayment>, JsonRejection>,
) -> Response {
    let Json(claim) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection.status(), rejection.body_text()),
    };

    match PaymentService::record_payment(app_state.db(), claim).await {
        Ok(outcome) => {
            let message = if outcome.duplicate {
                "Payment already processed"
            } else {
                "Payment data saved successfully"
            };
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    RecordedPayment {
                        payment_id: outcome.payment.id,
                        duplicate: outcome.duplicate,
                    },
                    message,
                )),
            )
                .into_response()
        }
        Err(e) => service_error_response(e, "Failed to process payment"),
    }
}
