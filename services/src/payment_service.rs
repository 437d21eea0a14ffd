use crate::error::{DenyReason, ServiceError};
use crate::validation::{validate_not_blank, validate_payment_plan};
use chrono::{DateTime, Duration, Utc};
use db::models::payment::{Model as Payment, NewPayment, PaymentPlan};
use db::models::submission::PlanType;
use sea_orm::{DatabaseConnection, SqlErr};
use serde::Deserialize;
use std::str::FromStr;
use tracing::{debug, info, warn};
use util::config::AppConfig;
use validator::Validate;

/// A client's claim that a payment happened.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayment {
    #[validate(
        required(message = "Plan is required"),
        custom(function = "validate_payment_plan")
    )]
    pub plan: Option<String>,

    #[validate(
        required(message = "Status is required"),
        custom(function = "validate_not_blank", message = "Status is required")
    )]
    pub status: Option<String>,

    #[validate(
        required(message = "Amount is required"),
        range(min = 0.0, message = "Amount must be a non-negative number")
    )]
    pub amount: Option<f64>,

    pub user_name: Option<String>,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
    pub payment_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentOutcome {
    pub payment: Payment,
    /// True when an existing record was returned instead of inserting a new one.
    pub duplicate: bool,
}

/// Blank strings are treated as missing.
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl CreatePayment {
    fn into_new_payment(self) -> Result<NewPayment, ServiceError> {
        self.validate()?;

        let plan = self
            .plan
            .as_deref()
            .and_then(|p| PaymentPlan::from_str(p).ok())
            .ok_or_else(|| ServiceError::invalid("plan", "Plan is required"))?;
        if plan == PaymentPlan::Mock && AppConfig::global().is_production() {
            return Err(ServiceError::invalid(
                "plan",
                "Mock payments are not accepted in production",
            ));
        }
        let status = present(self.status)
            .ok_or_else(|| ServiceError::invalid("status", "Status is required"))?;
        let amount = self
            .amount
            .ok_or_else(|| ServiceError::invalid("amount", "Amount is required"))?;

        Ok(NewPayment {
            plan,
            status,
            amount,
            user_name: present(self.user_name),
            payment_method: present(self.payment_method),
            transaction_id: present(self.transaction_id),
            payment_date: self.payment_date,
        })
    }
}

pub struct PaymentService;

impl PaymentService {
    pub async fn record_payment(
        db: &DatabaseConnection,
        claim: CreatePayment,
    ) -> Result<PaymentOutcome, ServiceError> {
        Self::record_payment_at(db, claim, Utc::now()).await
    }

    /// Record a payment claim, collapsing repeats onto the existing record.
    ///
    /// A claim is a repeat when its transaction id is already known, or when a
    /// payment with the same plan, amount and payer was created inside the
    /// duplicate window ending at `now`.
    pub async fn record_payment_at(
        db: &DatabaseConnection,
        claim: CreatePayment,
        now: DateTime<Utc>,
    ) -> Result<PaymentOutcome, ServiceError> {
        let new = claim.into_new_payment()?;

        if let Some(existing) = Self::find_by_transaction(db, new.transaction_id.as_deref()).await? {
            info!(payment_id = %existing.id, "Duplicate payment claim (transaction id)");
            return Ok(PaymentOutcome {
                payment: existing,
                duplicate: true,
            });
        }

        let window = AppConfig::global().payment_duplicate_window_minutes;
        let since = now - Duration::minutes(window);
        if let Some(existing) =
            Payment::find_recent_match(db, new.plan, new.amount, new.user_name.as_deref(), since)
                .await?
        {
            info!(payment_id = %existing.id, window, "Duplicate payment claim (recent match)");
            return Ok(PaymentOutcome {
                payment: existing,
                duplicate: true,
            });
        }

        let transaction_id = new.transaction_id.clone();
        match Payment::create(db, new, now).await {
            Ok(payment) => {
                info!(payment_id = %payment.id, plan = %payment.plan, "Payment recorded");
                Ok(PaymentOutcome {
                    payment,
                    duplicate: false,
                })
            }
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                // Lost a race against an identical claim.
                warn!(error = %err, "Concurrent payment claim");
                match Self::find_by_transaction(db, transaction_id.as_deref()).await? {
                    Some(existing) => Ok(PaymentOutcome {
                        payment: existing,
                        duplicate: true,
                    }),
                    None => Err(ServiceError::Storage(err.to_string())),
                }
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_transaction(
        db: &DatabaseConnection,
        transaction_id: Option<&str>,
    ) -> Result<Option<Payment>, ServiceError> {
        match transaction_id {
            Some(tx) => Ok(Payment::find_by_transaction_id(db, tx).await?),
            None => Ok(None),
        }
    }

    pub async fn find(db: &DatabaseConnection, id: &str) -> Result<Payment, ServiceError> {
        Payment::find_by_id(db, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Payment not found".into()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AccessDecision {
    Allowed(Payment),
    Denied(DenyReason),
}

/// Server-side check that a payment unlocks a plan.
pub struct PaymentGate;

impl PaymentGate {
    pub async fn verify_access(
        db: &DatabaseConnection,
        payment_id: &str,
        required: PlanType,
    ) -> Result<AccessDecision, ServiceError> {
        let Some(payment) = Payment::find_by_id(db, payment_id).await? else {
            debug!(payment_id, "Payment gate: unknown payment");
            return Ok(AccessDecision::Denied(DenyReason::NotFound));
        };

        if payment.plan.covers(required) {
            Ok(AccessDecision::Allowed(payment))
        } else {
            debug!(payment_id, plan = %payment.plan, required = %required, "Payment gate: plan mismatch");
            Ok(AccessDecision::Denied(DenyReason::PlanMismatch))
        }
    }

    /// Like [`verify_access`](Self::verify_access) but turns a denial into an error.
    pub async fn require_access(
        db: &DatabaseConnection,
        payment_id: &str,
        required: PlanType,
    ) -> Result<Payment, ServiceError> {
        match Self::verify_access(db, payment_id, required).await? {
            AccessDecision::Allowed(payment) => Ok(payment),
            AccessDecision::Denied(reason) => Err(ServiceError::AccessDenied(reason)),
        }
    }
}
