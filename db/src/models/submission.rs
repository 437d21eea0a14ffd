use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{Condition, FromJsonQueryResult, QueryOrder};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use util::storage::StoredObject;

/// A client's project request, with references to its stored attachments.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    /// Client-assigned; doubles as the storage folder name.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub plan_type: PlanType,
    pub full_name: String,
    pub email: String,
    pub submitted_at: String,
    pub status: SubmissionStatus,
    pub price: Option<f64>,

    #[sea_orm(column_type = "JsonBinary")]
    pub details: SubmissionDetails,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub resume: Option<StoredFile>,
    #[sea_orm(column_type = "JsonBinary")]
    pub uploaded_files: StoredFiles,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub pdf: Option<StoredFile>,

    pub payment_id: Option<String>,
    pub payment_date: Option<DateTime<Utc>>,
    pub payer_name: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "plan_type")]
#[strum(serialize_all = "lowercase")]
pub enum PlanType {
    #[sea_orm(string_value = "code")]
    Code,

    #[sea_orm(string_value = "live")]
    Live,
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "submission_status")]
#[strum(serialize_all = "kebab-case")]
pub enum SubmissionStatus {
    #[default]
    #[sea_orm(string_value = "pending")]
    Pending,

    #[sea_orm(string_value = "in-progress")]
    InProgress,

    #[sea_orm(string_value = "completed")]
    Completed,

    #[sea_orm(string_value = "rejected")]
    Rejected,

    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Optional form fields. Only the ones the client actually sent are stored,
/// so absent fields are omitted from the JSON rather than written as `null`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmissionDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_profile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_profile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub design_preferences: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_scheme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsive_preference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_media_links: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_preference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_timeline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_requests: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vercel_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vercel_password: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo_optimization: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_form_needed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blog_section: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio_gallery: Option<bool>,

    /// Parsed JSON when the client sent valid JSON, otherwise the raw string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<serde_json::Value>,
}

macro_rules! overlay {
    ($dst:ident, $src:ident; $($field:ident),+ $(,)?) => {
        $(
            if $src.$field.is_some() {
                $dst.$field = $src.$field;
            }
        )+
    };
}

impl SubmissionDetails {
    /// Overlay every field present in `patch`; absent fields keep their value.
    pub fn merge(&mut self, patch: SubmissionDetails) {
        overlay!(self, patch;
            title, job_profile, skills, github_profile, design_preferences,
            color_scheme, font_family, layout_style, responsive_preference,
            social_media_links, language_preference, target_audience,
            project_timeline, additional_requests, github_username,
            github_password, vercel_id, vercel_password,
            seo_optimization, contact_form_needed, blog_section, portfolio_gallery,
            projects, experience, education,
        );
    }
}

/// Reference to an object in the object store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub key: String,
    pub file_name: String,
    pub url: String,
    pub download_url: String,
    pub provider: String,
    pub content_type: String,
    pub size: u64,
}

impl From<StoredObject> for StoredFile {
    fn from(o: StoredObject) -> Self {
        Self {
            key: o.key,
            file_name: o.file_name,
            url: o.url,
            download_url: o.download_url,
            provider: o.provider,
            content_type: o.content_type,
            size: o.size,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct StoredFiles(pub Vec<StoredFile>);

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Everything needed to persist a fresh submission.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub id: String,
    pub plan_type: PlanType,
    pub full_name: String,
    pub email: String,
    pub submitted_at: String,
    pub status: SubmissionStatus,
    pub price: Option<f64>,
    pub details: SubmissionDetails,
    pub resume: Option<StoredFile>,
    pub uploaded_files: Vec<StoredFile>,
    pub pdf: Option<StoredFile>,
    pub payment_id: Option<String>,
    pub payment_date: Option<DateTime<Utc>>,
    pub payer_name: Option<String>,
}

/// Admin-editable fields; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct SubmissionUpdate {
    pub plan_type: Option<PlanType>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub status: Option<SubmissionStatus>,
    pub price: Option<f64>,
    pub details: Option<SubmissionDetails>,
}

/// Narrows the admin list; every `None` matches everything.
#[derive(Debug, Clone, Default)]
pub struct SubmissionFilter {
    pub status: Option<SubmissionStatus>,
    pub plan_type: Option<PlanType>,
    /// Case-insensitive partial match against name, email or id.
    pub search: Option<String>,
}

impl Model {
    pub async fn create(db: &DbConn, new: NewSubmission) -> Result<Model, DbErr> {
        let now = Utc::now();

        let active_model = ActiveModel {
            id: Set(new.id),
            plan_type: Set(new.plan_type),
            full_name: Set(new.full_name),
            email: Set(new.email),
            submitted_at: Set(new.submitted_at),
            status: Set(new.status),
            price: Set(new.price),
            details: Set(new.details),
            resume: Set(new.resume),
            uploaded_files: Set(StoredFiles(new.uploaded_files)),
            pdf: Set(new.pdf),
            payment_id: Set(new.payment_id),
            payment_date: Set(new.payment_date),
            payer_name: Set(new.payer_name),
            created_at: Set(now),
            updated_at: Set(now),
        };

        active_model.insert(db).await
    }

    pub async fn find_by_id(db: &DbConn, id: &str) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id.to_owned()).one(db).await
    }

    pub async fn exists(db: &DbConn, id: &str) -> Result<bool, DbErr> {
        Ok(Self::find_by_id(db, id).await?.is_some())
    }

    /// Submissions matching `filter`, newest first.
    pub async fn list_newest_first(
        db: &DbConn,
        filter: &SubmissionFilter,
    ) -> Result<Vec<Model>, DbErr> {
        let mut condition = Condition::all();

        if let Some(status) = filter.status {
            condition = condition.add(Column::Status.eq(status));
        }
        if let Some(plan_type) = filter.plan_type {
            condition = condition.add(Column::PlanType.eq(plan_type));
        }
        if let Some(term) = filter.search.as_deref() {
            condition = condition.add(
                Condition::any()
                    .add(Column::FullName.contains(term))
                    .add(Column::Email.contains(term))
                    .add(Column::Id.contains(term)),
            );
        }

        Entity::find()
            .filter(condition)
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(db)
            .await
    }

    pub async fn apply_update(
        db: &DbConn,
        model: Model,
        update: SubmissionUpdate,
    ) -> Result<Model, DbErr> {
        let mut active_model: ActiveModel = model.into();

        if let Some(plan_type) = update.plan_type {
            active_model.plan_type = Set(plan_type);
        }
        if let Some(full_name) = update.full_name {
            active_model.full_name = Set(full_name);
        }
        if let Some(email) = update.email {
            active_model.email = Set(email);
        }
        if let Some(status) = update.status {
            active_model.status = Set(status);
        }
        if let Some(price) = update.price {
            active_model.price = Set(Some(price));
        }
        if let Some(details) = update.details {
            active_model.details = Set(details);
        }
        active_model.updated_at = Set(Utc::now());

        active_model.update(db).await
    }

    /// Returns `false` when no row had that id.
    pub async fn delete_by_id(db: &DbConn, id: &str) -> Result<bool, DbErr> {
        let result = Entity::delete_by_id(id.to_owned()).exec(db).await?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;
    use std::str::FromStr;

    fn new_submission(id: &str) -> NewSubmission {
        NewSubmission {
            id: id.into(),
            plan_type: PlanType::Code,
            full_name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            submitted_at: "2025-10-19T10:00:00Z".into(),
            status: SubmissionStatus::Pending,
            price: Some(2500.0),
            details: SubmissionDetails {
                title: Some("Engineer".into()),
                seo_optimization: Some(true),
                ..Default::default()
            },
            resume: None,
            uploaded_files: vec![],
            pdf: None,
            payment_id: None,
            payment_date: None,
            payer_name: None,
        }
    }

    #[test]
    fn status_uses_kebab_case_on_the_wire() {
        assert_eq!(SubmissionStatus::InProgress.to_string(), "in-progress");
        assert_eq!(
            SubmissionStatus::from_str("in-progress").unwrap(),
            SubmissionStatus::InProgress
        );
        assert!(SubmissionStatus::from_str("archived").is_err());
        assert!(PlanType::from_str("nonsense").is_err());
    }

    #[test]
    fn details_omit_absent_fields() {
        let details = SubmissionDetails {
            job_profile: Some("Designer".into()),
            blog_section: Some(false),
            ..Default::default()
        };
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "jobProfile": "Designer", "blogSection": false })
        );
    }

    #[test]
    fn merge_overlays_only_present_fields() {
        let mut details = SubmissionDetails {
            title: Some("Old".into()),
            skills: Some("Rust".into()),
            ..Default::default()
        };
        details.merge(SubmissionDetails {
            title: Some("New".into()),
            portfolio_gallery: Some(true),
            ..Default::default()
        });

        assert_eq!(details.title.as_deref(), Some("New"));
        assert_eq!(details.skills.as_deref(), Some("Rust"));
        assert_eq!(details.portfolio_gallery, Some(true));
    }

    #[tokio::test]
    async fn create_find_update_delete() {
        let db = setup_test_db().await;

        let created = Model::create(&db, new_submission("sub-1")).await.unwrap();
        assert_eq!(created.status, SubmissionStatus::Pending);
        assert!(created.uploaded_files.0.is_empty());

        let found = Model::find_by_id(&db, "sub-1").await.unwrap().unwrap();
        assert_eq!(found.details, created.details);
        assert_eq!(found.price, Some(2500.0));

        let updated = Model::apply_update(
            &db,
            found,
            SubmissionUpdate {
                status: Some(SubmissionStatus::InProgress),
                price: Some(3000.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.status, SubmissionStatus::InProgress);
        assert_eq!(updated.price, Some(3000.0));
        assert_eq!(updated.full_name, "Ada Lovelace");

        assert!(Model::delete_by_id(&db, "sub-1").await.unwrap());
        assert!(!Model::delete_by_id(&db, "sub-1").await.unwrap());
        assert!(!Model::exists(&db, "sub-1").await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected() {
        let db = setup_test_db().await;
        Model::create(&db, new_submission("dup")).await.unwrap();
        assert!(Model::create(&db, new_submission("dup")).await.is_err());
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let db = setup_test_db().await;
        Model::create(&db, new_submission("first")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        Model::create(&db, new_submission("second")).await.unwrap();

        let ids: Vec<String> = Model::list_newest_first(&db, &SubmissionFilter::default())
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn list_filters_by_status_plan_and_search() {
        let db = setup_test_db().await;
        Model::create(&db, new_submission("code-1")).await.unwrap();

        let mut live = new_submission("live-1");
        live.plan_type = PlanType::Live;
        live.full_name = "Grace Hopper".into();
        live.email = "grace@navy.mil".into();
        live.status = SubmissionStatus::Completed;
        Model::create(&db, live).await.unwrap();

        let ids = |models: Vec<Model>| models.into_iter().map(|m| m.id).collect::<Vec<_>>();

        let by_plan = SubmissionFilter {
            plan_type: Some(PlanType::Live),
            ..Default::default()
        };
        assert_eq!(ids(Model::list_newest_first(&db, &by_plan).await.unwrap()), vec!["live-1"]);

        let by_status = SubmissionFilter {
            status: Some(SubmissionStatus::Pending),
            ..Default::default()
        };
        assert_eq!(ids(Model::list_newest_first(&db, &by_status).await.unwrap()), vec!["code-1"]);

        let by_search = SubmissionFilter {
            search: Some("NAVY".into()),
            ..Default::default()
        };
        assert_eq!(ids(Model::list_newest_first(&db, &by_search).await.unwrap()), vec!["live-1"]);

        let nothing = SubmissionFilter {
            plan_type: Some(PlanType::Code),
            search: Some("grace".into()),
            ..Default::default()
        };
        assert!(Model::list_newest_first(&db, &nothing).await.unwrap().is_empty());
    }
}
