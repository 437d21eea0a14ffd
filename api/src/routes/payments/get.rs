use crate::response::ApiResponse;
use crate::routes::common::{PaymentDetails, bad_request, service_error_response};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use db::models::submission::PlanType;
use serde::{Deserialize, Serialize};
use services::payment_service::{PaymentGate, PaymentService};
use std::str::FromStr;
use util::state::AppState;

#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    pub id: Option<String>,
    pub plan: Option<String>,
}

/// GET /api/payments/verify?id={payment_id}&plan={code|live}
///
/// Server-side check that a payment unlocks a plan. `plan` defaults to `live`.
/// A `mock` payment unlocks everything and a `live` payment also unlocks `code`.
///
/// ### Responses
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "data": {
///     "id": "5c1fd1e2-…",
///     "plan": "live",
///     "date": "2025-10-19T09:30:00Z",
///     "userName": "Alice",
///     "amount": 4500.0,
///     "transactionId": "TX-1029",
///     "status": "completed"
///   },
///   "message": "Payment verified"
/// }
/// ```
/// - `400 Bad Request` (missing `id` or unknown `plan`)
/// - `403 Forbidden` (payment does not cover the plan)
/// - `404 Not Found`
pub async fn verify_payment(
    State(app_state): State<AppState>,
    Query(query): Query<VerifyQuery>,
) -> Response {
    let Some(id) = query.id.filter(|id| !id.trim().is_empty()) else {
        return bad_request("Payment ID is required");
    };
    let required = match query.plan.as_deref() {
        None | Some("") => PlanType::Live,
        Some(plan) => match PlanType::from_str(plan) {
            Ok(plan) => plan,
            Err(_) => return bad_request("Plan must be one of: code, live"),
        },
    };

    match PaymentGate::require_access(app_state.db(), &id, required).await {
        Ok(payment) => {
            let mut details = PaymentDetails::from(payment);
            details.user_name.get_or_insert_with(|| "User".to_string());
            (
                StatusCode::OK,
                Json(ApiResponse::success(details, "Payment verified")),
            )
                .into_response()
        }
        Err(e) => service_error_response(e, "Failed to verify payment"),
    }
}

#[derive(Debug, Deserialize)]
pub struct DetailsQuery {
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub transaction_id: Option<String>,
    pub amount: f64,
    pub payment_date: DateTime<Utc>,
    pub plan: String,
    pub status: String,
    pub user_name: Option<String>,
}

/// GET /api/payments/details?id={payment_id}
///
/// Receipt data for the confirmation page. Does not check any plan.
///
/// ### Responses
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "data": {
///     "transactionId": "TX-1029",
///     "amount": 2500.0,
///     "paymentDate": "2025-10-19T09:30:00Z",
///     "plan": "code",
///     "status": "completed",
///     "userName": "Alice"
///   },
///   "message": "Payment details retrieved successfully"
/// }
/// ```
/// - `400 Bad Request` (missing `id`)
/// - `404 Not Found`
pub async fn payment_details(
    State(app_state): State<AppState>,
    Query(query): Query<DetailsQuery>,
) -> Response {
    let Some(id) = query.id.filter(|id| !id.trim().is_empty()) else {
        return bad_request("Payment ID is required");
    };

    match PaymentService::find(app_state.db(), &id).await {
        Ok(payment) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                PaymentSummary {
                    transaction_id: payment.transaction_id,
                    amount: payment.amount,
                    payment_date: payment.payment_date,
                    plan: payment.plan.to_string(),
                    status: payment.status,
                    user_name: payment.user_name,
                },
                "Payment details retrieved successfully",
            )),
        )
            .into_response(),
        Err(e) => service_error_response(e, "Failed to retrieve payment details"),
    }
}
