//! Field rules shared by the intake and admin update paths.

use common::FieldViolation;
use db::models::payment::PaymentPlan;
use db::models::submission::{PlanType, SubmissionDetails, SubmissionStatus};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::str::FromStr;
use validator::ValidationError;

pub static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Submission ids double as storage folder names.
pub static SUBMISSION_ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,64}$").expect("valid id regex"));

/// Alphanumerics separated by single hyphens; no leading or trailing hyphen.
static GITHUB_USERNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z\d](?:[A-Za-z\d]|-[A-Za-z\d])*$").expect("valid github regex"));

const GITHUB_USERNAME_MAX: usize = 39;

fn rule(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

pub fn validate_submission_id(id: &str) -> Result<(), ValidationError> {
    if SUBMISSION_ID_REGEX.is_match(id) {
        Ok(())
    } else {
        Err(rule(
            "submission_id",
            "Submission id may only contain letters, digits, '-' and '_' (max 64 characters)",
        ))
    }
}

pub fn validate_plan_type(plan: &str) -> Result<(), ValidationError> {
    PlanType::from_str(plan)
        .map(|_| ())
        .map_err(|_| rule("plan_type", "Plan type must be one of: code, live"))
}

pub fn validate_payment_plan(plan: &str) -> Result<(), ValidationError> {
    PaymentPlan::from_str(plan)
        .map(|_| ())
        .map_err(|_| rule("payment_plan", "Plan must be one of: code, live, mock"))
}

pub fn validate_status(status: &str) -> Result<(), ValidationError> {
    SubmissionStatus::from_str(status).map(|_| ()).map_err(|_| {
        rule(
            "status",
            "Status must be one of: pending, in-progress, completed, rejected, cancelled",
        )
    })
}

/// Parses a client-supplied price; `None` when it is not a finite, non-negative number.
pub fn parse_price(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p >= 0.0)
}

pub fn validate_price_text(raw: &str) -> Result<(), ValidationError> {
    parse_price(raw)
        .map(|_| ())
        .ok_or_else(|| rule("price", "Price must be a non-negative number"))
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(rule("blank", "Value must not be blank"))
    } else {
        Ok(())
    }
}

pub fn is_valid_github_username(name: &str) -> bool {
    name.len() <= GITHUB_USERNAME_MAX && GITHUB_USERNAME_REGEX.is_match(name)
}

/// Rules on the free-form detail fields. Reported with their wire names.
pub fn detail_violations(details: &SubmissionDetails) -> Vec<FieldViolation> {
    let mut out = Vec::new();

    if let Some(name) = details.github_username.as_deref() {
        if !is_valid_github_username(name) {
            out.push(FieldViolation::new(
                "githubUsername",
                "GitHub username may only contain alphanumerics and single hyphens, cannot start or end with a hyphen, and is at most 39 characters",
            ));
        }
    }

    if let Some(vercel_id) = details.vercel_id.as_deref() {
        if vercel_id.trim().is_empty() {
            out.push(FieldViolation::new("vercelId", "Vercel ID must not be blank"));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn github_usernames() {
        assert!(is_valid_github_username("octocat"));
        assert!(is_valid_github_username("a-b-c1"));
        assert!(!is_valid_github_username("-leading"));
        assert!(!is_valid_github_username("trailing-"));
        assert!(!is_valid_github_username("double--hyphen"));
        assert!(!is_valid_github_username("under_score"));
        assert!(!is_valid_github_username(&"a".repeat(40)));
        assert!(is_valid_github_username(&"a".repeat(39)));
    }

    #[test]
    fn emails() {
        assert!(EMAIL_REGEX.is_match("ada@example.com"));
        assert!(!EMAIL_REGEX.is_match("ada@example"));
        assert!(!EMAIL_REGEX.is_match("ada example@x.com"));
    }

    #[test]
    fn prices() {
        assert_eq!(parse_price(" 2500 "), Some(2500.0));
        assert_eq!(parse_price("0"), Some(0.0));
        assert_eq!(parse_price("-1"), None);
        assert_eq!(parse_price("abc"), None);
        assert_eq!(parse_price("NaN"), None);
    }

    #[test]
    fn blank_vercel_id_is_reported() {
        let details = SubmissionDetails {
            vercel_id: Some("   ".into()),
            github_username: Some("ok-name".into()),
            ..Default::default()
        };
        let violations = detail_violations(&details);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "vercelId");
    }

    #[test]
    fn enum_rules_accept_wire_values() {
        assert!(validate_status("in-progress").is_ok());
        assert!(validate_status("done").is_err());
        assert!(validate_plan_type("live").is_ok());
        assert!(validate_plan_type("mock").is_err());
        assert!(validate_payment_plan("mock").is_ok());
    }
}
