use crate::error::ServiceError;
use crate::payment_service::PaymentGate;
use crate::pdf::SubmissionPdf;
use crate::validation::{
    EMAIL_REGEX, detail_violations, parse_price, validate_not_blank, validate_plan_type,
    validate_price_text, validate_status, validate_submission_id,
};
use bytes::Bytes;
use chrono::Utc;
use common::FieldViolation;
use db::models::submission::{
    Model as Submission, NewSubmission, PlanType, StoredFile, SubmissionDetails, SubmissionFilter,
    SubmissionStatus, SubmissionUpdate,
};
use sea_orm::{DatabaseConnection, SqlErr};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use tracing::{error, info, warn};
use util::config::AppConfig;
use util::storage::{self, Area, FolderCleanup, ObjectStore};
use validator::{Validate, ValidationError};

/// A file received from the client.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// A submission as received from the intake form, before validation.
///
/// Every field is optional here; [`SubmissionService::submit`] decides what is required.
#[derive(Debug, Clone, Default, Validate)]
pub struct CreateSubmission {
    #[validate(
        required(message = "Submission id is required"),
        custom(function = "validate_submission_id")
    )]
    pub id: Option<String>,

    #[validate(
        required(message = "Plan type is required"),
        custom(function = "validate_plan_type")
    )]
    pub plan_type: Option<String>,

    #[validate(required(message = "Full name is required"))]
    pub full_name: Option<String>,

    #[validate(
        required(message = "Email is required"),
        regex(path = &*EMAIL_REGEX, message = "Invalid email format")
    )]
    pub email: Option<String>,

    pub submitted_at: Option<String>,

    #[validate(custom(function = "validate_status"))]
    pub status: Option<String>,

    #[validate(custom(function = "validate_price_text"))]
    pub price: Option<String>,

    pub payment_id: Option<String>,

    pub details: SubmissionDetails,
    pub resume: Option<FileUpload>,
    pub uploaded_files: Vec<FileUpload>,
}

impl CreateSubmission {
    /// Route one text form field to where it belongs.
    ///
    /// Unknown names are ignored and blank values are treated as absent.
    /// Returns whether the name was recognized.
    pub fn set_text_field(&mut self, name: &str, value: String) -> bool {
        let value = if value.trim().is_empty() {
            None
        } else {
            Some(value)
        };
        let d = &mut self.details;

        let slot: &mut Option<String> = match name {
            "id" => &mut self.id,
            "planType" => &mut self.plan_type,
            "fullName" => &mut self.full_name,
            "email" => &mut self.email,
            "submittedAt" => &mut self.submitted_at,
            "status" => &mut self.status,
            "price" => &mut self.price,
            "paymentId" => &mut self.payment_id,

            "title" => &mut d.title,
            "jobProfile" => &mut d.job_profile,
            "skills" => &mut d.skills,
            "githubProfile" => &mut d.github_profile,
            "designPreferences" => &mut d.design_preferences,
            "colorScheme" => &mut d.color_scheme,
            "fontFamily" => &mut d.font_family,
            "layoutStyle" => &mut d.layout_style,
            "responsivePreference" => &mut d.responsive_preference,
            "socialMediaLinks" => &mut d.social_media_links,
            "languagePreference" => &mut d.language_preference,
            "targetAudience" => &mut d.target_audience,
            "projectTimeline" => &mut d.project_timeline,
            "additionalRequests" => &mut d.additional_requests,
            "githubUsername" => &mut d.github_username,
            "githubPassword" => &mut d.github_password,
            "vercelId" => &mut d.vercel_id,
            "vercelPassword" => &mut d.vercel_password,

            "seoOptimization" | "contactFormNeeded" | "blogSection" | "portfolioGallery" => {
                let flag = value.map(|v| v == "true");
                match name {
                    "seoOptimization" => d.seo_optimization = flag,
                    "contactFormNeeded" => d.contact_form_needed = flag,
                    "blogSection" => d.blog_section = flag,
                    _ => d.portfolio_gallery = flag,
                }
                return true;
            }

            "projects" | "experience" | "education" => {
                let parsed = value.map(|v| serde_json::from_str(&v).unwrap_or(Value::String(v)));
                match name {
                    "projects" => d.projects = parsed,
                    "experience" => d.experience = parsed,
                    _ => d.education = parsed,
                }
                return true;
            }

            _ => return false,
        };

        *slot = value;
        true
    }

    fn violations(&self) -> Vec<FieldViolation> {
        let mut out = match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => common::field_violations(&errors),
        };
        out.extend(detail_violations(&self.details));
        out
    }
}

/// Price as sent by the admin UI: either a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Number(f64),
    Text(String),
}

impl PriceInput {
    pub fn value(&self) -> Option<f64> {
        match self {
            PriceInput::Number(n) if n.is_finite() && *n >= 0.0 => Some(*n),
            PriceInput::Number(_) => None,
            PriceInput::Text(s) => parse_price(s),
        }
    }
}

fn validate_price_input(price: &PriceInput) -> Result<(), ValidationError> {
    match price.value() {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("price")
            .with_message("Price must be a non-negative number".into())),
    }
}

/// Partial update applied by an admin.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubmission {
    #[validate(custom(function = "validate_plan_type"))]
    pub plan_type: Option<String>,

    #[validate(custom(function = "validate_not_blank", message = "Full name must not be blank"))]
    pub full_name: Option<String>,

    #[validate(regex(path = &*EMAIL_REGEX, message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(custom(function = "validate_status"))]
    pub status: Option<String>,

    #[validate(custom(function = "validate_price_input"))]
    pub price: Option<PriceInput>,

    pub details: Option<SubmissionDetails>,
}

impl UpdateSubmission {
    fn violations(&self) -> Vec<FieldViolation> {
        let mut out = match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => common::field_violations(&errors),
        };
        if let Some(details) = &self.details {
            out.extend(detail_violations(details));
        }
        out
    }
}

/// Admin list filters as they arrive in the query string.
///
/// Blank values and `all` mean "no filter".
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListSubmissions {
    #[validate(custom(function = "validate_status"))]
    pub status: Option<String>,

    #[validate(custom(function = "validate_plan_type"))]
    pub plan_type: Option<String>,

    pub query: Option<String>,
}

fn filter_value(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

impl ListSubmissions {
    fn into_filter(self) -> Result<SubmissionFilter, ServiceError> {
        let normalized = ListSubmissions {
            status: filter_value(self.status),
            plan_type: filter_value(self.plan_type),
            query: filter_value(self.query),
        };
        normalized.validate()?;

        Ok(SubmissionFilter {
            status: normalized
                .status
                .as_deref()
                .and_then(|s| SubmissionStatus::from_str(s).ok()),
            plan_type: normalized
                .plan_type
                .as_deref()
                .and_then(|p| PlanType::from_str(p).ok()),
            search: normalized.query,
        })
    }
}

pub struct SubmissionService;

impl SubmissionService {
    /// Validate, upload attachments, render the summary PDF and persist.
    ///
    /// Attachment and PDF failures are logged and skipped; only validation,
    /// the payment gate and the final insert can fail the request.
    pub async fn submit(
        db: &DatabaseConnection,
        store: &dyn ObjectStore,
        form: CreateSubmission,
    ) -> Result<Submission, ServiceError> {
        let mut violations = form.violations();
        if let Some(id) = form.id.as_deref() {
            let id_is_valid = !violations.iter().any(|v| v.field == "id");
            if id_is_valid && Submission::exists(db, id).await? {
                violations.push(duplicate_id());
            }
        }
        if !violations.is_empty() {
            violations.sort();
            return Err(ServiceError::Validation(violations));
        }

        let (pdf_enabled, requires_payment) = {
            let config = AppConfig::global();
            (config.pdf_enabled, config.submission_requires_payment)
        };

        let CreateSubmission {
            id,
            plan_type,
            full_name,
            email,
            submitted_at,
            status,
            price,
            payment_id,
            details,
            resume,
            uploaded_files,
        } = form;

        let id = id.ok_or_else(|| ServiceError::invalid("id", "Submission id is required"))?;
        let plan_type = plan_type
            .as_deref()
            .and_then(|p| PlanType::from_str(p).ok())
            .ok_or_else(|| ServiceError::invalid("planType", "Plan type is required"))?;
        let status = status
            .as_deref()
            .map(SubmissionStatus::from_str)
            .transpose()
            .map_err(|_| ServiceError::invalid("status", "Invalid status"))?
            .unwrap_or_default();

        let payment = match payment_id.as_deref() {
            Some(payment_id) => Some(PaymentGate::require_access(db, payment_id, plan_type).await?),
            None if requires_payment => {
                return Err(ServiceError::invalid("paymentId", "A verified payment is required"));
            }
            None => None,
        };

        let mut record = NewSubmission {
            plan_type,
            full_name: full_name.unwrap_or_default(),
            email: email.unwrap_or_default(),
            submitted_at: submitted_at.unwrap_or_else(|| Utc::now().to_rfc3339()),
            status,
            price: price.as_deref().and_then(parse_price),
            details,
            resume: None,
            uploaded_files: Vec::new(),
            pdf: None,
            payment_id: payment.as_ref().map(|p| p.id.clone()),
            payment_date: payment.as_ref().map(|p| p.payment_date),
            payer_name: payment.and_then(|p| p.user_name),
            id,
        };

        if pdf_enabled {
            record.pdf = Self::store_pdf(store, &record).await;
        }
        if let Some(file) = resume {
            record.resume = Self::store_attachment(store, &record.id, file).await;
        }
        for file in uploaded_files {
            if let Some(stored) = Self::store_attachment(store, &record.id, file).await {
                record.uploaded_files.push(stored);
            }
        }

        let stored_anything = record.pdf.is_some()
            || record.resume.is_some()
            || !record.uploaded_files.is_empty();
        let id = record.id.clone();

        match Submission::create(db, record).await {
            Ok(submission) => {
                info!(
                    submission_id = %submission.id,
                    plan = %submission.plan_type,
                    files = submission.uploaded_files.0.len(),
                    "Submission stored"
                );
                Ok(submission)
            }
            Err(err) => {
                error!(submission_id = %id, error = %err, "Failed to persist submission");
                if stored_anything {
                    storage::delete_folder(store, Area::Submissions, &id).await;
                }
                if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                    Err(ServiceError::Validation(vec![duplicate_id()]))
                } else {
                    Err(err.into())
                }
            }
        }
    }

    async fn store_pdf(store: &dyn ObjectStore, record: &NewSubmission) -> Option<StoredFile> {
        let bytes = match SubmissionPdf::from_submission(record).render() {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(submission_id = %record.id, error = %e, "Skipping summary PDF");
                return None;
            }
        };

        let file_name = format!("{}-submission.pdf", record.id);
        let upload = storage::upload_file(
            store,
            Area::Submissions,
            &record.id,
            &file_name,
            "application/pdf",
            bytes.into(),
        );
        match upload.await {
            Ok(stored) => Some(stored.into()),
            Err(e) => {
                warn!(submission_id = %record.id, error = %e, "Failed to upload summary PDF");
                None
            }
        }
    }

    async fn store_attachment(
        store: &dyn ObjectStore,
        folder: &str,
        file: FileUpload,
    ) -> Option<StoredFile> {
        let content_type = storage::content_type_for(&file.file_name, Some(&file.content_type));
        let upload = storage::upload_file(
            store,
            Area::Submissions,
            folder,
            &file.file_name,
            &content_type,
            file.bytes,
        );
        match upload.await {
            Ok(stored) => Some(stored.into()),
            Err(e) => {
                warn!(
                    submission_id = %folder,
                    file = %file.file_name,
                    error = %e,
                    "Skipping attachment that failed to upload"
                );
                None
            }
        }
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: &str,
        patch: UpdateSubmission,
    ) -> Result<Submission, ServiceError> {
        let mut violations = patch.violations();
        if !violations.is_empty() {
            violations.sort();
            return Err(ServiceError::Validation(violations));
        }

        let existing = Self::find(db, id).await?;

        let details = patch.details.map(|changes| {
            let mut merged = existing.details.clone();
            merged.merge(changes);
            merged
        });

        let update = SubmissionUpdate {
            plan_type: patch.plan_type.as_deref().and_then(|p| PlanType::from_str(p).ok()),
            full_name: patch.full_name,
            email: patch.email,
            status: patch
                .status
                .as_deref()
                .and_then(|s| SubmissionStatus::from_str(s).ok()),
            price: patch.price.as_ref().and_then(PriceInput::value),
            details,
        };

        let updated = Submission::apply_update(db, existing, update).await?;
        info!(submission_id = %updated.id, status = %updated.status, "Submission updated");
        Ok(updated)
    }

    /// Remove the record, then every stored object in its folder.
    ///
    /// Storage cleanup is best-effort: failures are reported, never returned as errors.
    pub async fn delete(
        db: &DatabaseConnection,
        store: &dyn ObjectStore,
        id: &str,
    ) -> Result<FolderCleanup, ServiceError> {
        if !Submission::delete_by_id(db, id).await? {
            return Err(not_found());
        }

        let cleanup = storage::delete_folder(store, Area::Submissions, id).await;
        if cleanup.failed.is_empty() {
            info!(submission_id = %id, deleted = cleanup.deleted, "Submission deleted");
        } else {
            warn!(
                submission_id = %id,
                deleted = cleanup.deleted,
                failed = cleanup.failed.len(),
                "Submission deleted; some stored files were left behind"
            );
        }
        Ok(cleanup)
    }

    pub async fn list(
        db: &DatabaseConnection,
        query: ListSubmissions,
    ) -> Result<Vec<Submission>, ServiceError> {
        let filter = query.into_filter()?;
        Ok(Submission::list_newest_first(db, &filter).await?)
    }

    pub async fn find(db: &DatabaseConnection, id: &str) -> Result<Submission, ServiceError> {
        Submission::find_by_id(db, id).await?.ok_or_else(not_found)
    }
}

fn not_found() -> ServiceError {
    ServiceError::NotFound("Submission not found".into())
}

fn duplicate_id() -> FieldViolation {
    FieldViolation::new("id", "A submission with this id already exists")
}
