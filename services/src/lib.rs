pub mod error;
pub mod payment_service;
pub mod pdf;
pub mod submission_service;
pub mod validation;

pub use error::{DenyReason, ServiceError};
