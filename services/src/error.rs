use common::FieldViolation;
use sea_orm::DbErr;
use thiserror::Error;
use validator::ValidationErrors;

/// Why the payment gate refused a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    NotFound,
    PlanMismatch,
}

impl DenyReason {
    pub fn message(self) -> &'static str {
        match self {
            DenyReason::NotFound => "Payment not found",
            DenyReason::PlanMismatch => "Payment does not cover the requested plan",
        }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation failed: {}", common::join_violations(.0))]
    Validation(Vec<FieldViolation>),

    #[error("{0}")]
    NotFound(String),

    #[error("Payload exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize },

    #[error("{}", .0.message())]
    AccessDenied(DenyReason),

    /// Persistence failed. Carries the underlying detail for logging only.
    #[error("Storage failure: {0}")]
    Storage(String),

    /// An external dependency (object store, PDF renderer) failed.
    #[error("Upstream failure: {0}")]
    Upstream(String),
}

impl ServiceError {
    pub fn invalid(field: &str, message: &str) -> Self {
        ServiceError::Validation(vec![FieldViolation::new(field, message)])
    }

    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            ServiceError::Validation(v) => v,
            _ => &[],
        }
    }
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        ServiceError::Storage(err.to_string())
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        ServiceError::Validation(common::field_violations(&errors))
    }
}

impl From<util::storage::StorageError> for ServiceError {
    fn from(err: util::storage::StorageError) -> Self {
        ServiceError::Upstream(err.to_string())
    }
}
