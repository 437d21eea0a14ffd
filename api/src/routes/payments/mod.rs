//! # Payments Routes
//!
//! - `POST /payments/create` → `create_payment`
//! - `GET /payments/verify?id=&plan=` → `verify_payment`
//! - `GET /payments/details?id=` → `payment_details`
//!
//! All three are public: the payment id itself is the capability.

pub mod get;
pub mod post;

use axum::{
    Router,
    routing::{get, post},
};
use get::{payment_details, verify_payment};
use post::create_payment;
use util::state::AppState;

pub fn payments_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_payment))
        .route("/verify", get(verify_payment))
        .route("/details", get(payment_details))
}
