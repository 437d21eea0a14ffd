use super::submission::PlanType;
use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::QueryOrder;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A recorded payment confirmation. Never mutated once written.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub plan: PaymentPlan,
    pub status: String,
    pub amount: f64,
    pub payment_date: DateTime<Utc>,

    pub user_name: Option<String>,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,

    pub created_at: DateTime<Utc>,
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
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_plan")]
#[strum(serialize_all = "lowercase")]
pub enum PaymentPlan {
    #[sea_orm(string_value = "code")]
    Code,

    #[sea_orm(string_value = "live")]
    Live,

    /// Test tier; grants every plan.
    #[sea_orm(string_value = "mock")]
    Mock,
}

impl PaymentPlan {
    /// Whether a payment for `self` unlocks a submission of plan `required`.
    ///
    /// `live` includes everything `code` offers; `mock` unlocks everything.
    pub fn covers(self, required: PlanType) -> bool {
        match self {
            PaymentPlan::Mock | PaymentPlan::Live => true,
            PaymentPlan::Code => required == PlanType::Code,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub plan: PaymentPlan,
    pub status: String,
    pub amount: f64,
    pub user_name: Option<String>,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
    /// Defaults to the creation time.
    pub payment_date: Option<DateTime<Utc>>,
}

impl Model {
    pub async fn create(db: &DbConn, new: NewPayment, now: DateTime<Utc>) -> Result<Model, DbErr> {
        let active_model = ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            plan: Set(new.plan),
            status: Set(new.status),
            amount: Set(new.amount),
            payment_date: Set(new.payment_date.unwrap_or(now)),
            user_name: Set(new.user_name),
            payment_method: Set(new.payment_method),
            transaction_id: Set(new.transaction_id),
            created_at: Set(now),
        };

        active_model.insert(db).await
    }

    pub async fn find_by_id(db: &DbConn, id: &str) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id.to_owned()).one(db).await
    }

    pub async fn find_by_transaction_id(
        db: &DbConn,
        transaction_id: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::TransactionId.eq(transaction_id))
            .order_by_asc(Column::CreatedAt)
            .one(db)
            .await
    }

    /// Most recent payment with the same plan, amount and payer created at or
    /// after `since`. A missing payer only matches other missing payers.
    pub async fn find_recent_match(
        db: &DbConn,
        plan: PaymentPlan,
        amount: f64,
        user_name: Option<&str>,
        since: DateTime<Utc>,
    ) -> Result<Option<Model>, DbErr> {
        let mut query = Entity::find()
            .filter(Column::Plan.eq(plan))
            .filter(Column::Amount.eq(amount))
            .filter(Column::CreatedAt.gte(since));

        query = match user_name {
            Some(name) => query.filter(Column::UserName.eq(name)),
            None => query.filter(Column::UserName.is_null()),
        };

        query.order_by_desc(Column::CreatedAt).one(db).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;
    use chrono::Duration;

    fn claim(user: Option<&str>, tx: Option<&str>) -> NewPayment {
        NewPayment {
            plan: PaymentPlan::Code,
            status: "completed".into(),
            amount: 2500.0,
            user_name: user.map(str::to_string),
            payment_method: Some("qr".into()),
            transaction_id: tx.map(str::to_string),
            payment_date: None,
        }
    }

    #[test]
    fn plan_coverage() {
        assert!(PaymentPlan::Code.covers(PlanType::Code));
        assert!(!PaymentPlan::Code.covers(PlanType::Live));
        assert!(PaymentPlan::Live.covers(PlanType::Code));
        assert!(PaymentPlan::Live.covers(PlanType::Live));
        assert!(PaymentPlan::Mock.covers(PlanType::Code));
        assert!(PaymentPlan::Mock.covers(PlanType::Live));
    }

    #[tokio::test]
    async fn payment_date_defaults_to_creation_time() {
        let db = setup_test_db().await;
        let now = Utc::now();
        let created = Model::create(&db, claim(Some("Alice"), None), now).await.unwrap();

        assert_eq!(created.payment_date, created.created_at);
        assert_eq!(created.id.len(), 36);
    }

    #[tokio::test]
    async fn transaction_lookup() {
        let db = setup_test_db().await;
        let created = Model::create(&db, claim(Some("Alice"), Some("TX-1")), Utc::now())
            .await
            .unwrap();

        let found = Model::find_by_transaction_id(&db, "TX-1").await.unwrap();
        assert_eq!(found.map(|p| p.id), Some(created.id));
        assert!(Model::find_by_transaction_id(&db, "TX-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn same_transaction_and_user_violates_unique_index() {
        let db = setup_test_db().await;
        Model::create(&db, claim(Some("Alice"), Some("TX-1")), Utc::now())
            .await
            .unwrap();

        let err = Model::create(&db, claim(Some("Alice"), Some("TX-1")), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(
            err.sql_err(),
            Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
        ));
    }

    #[tokio::test]
    async fn recent_match_respects_window_and_null_payer() {
        let db = setup_test_db().await;
        let now = Utc::now();
        let anon = Model::create(&db, claim(None, None), now).await.unwrap();

        let since = now - Duration::minutes(30);
        let hit = Model::find_recent_match(&db, PaymentPlan::Code, 2500.0, None, since)
            .await
            .unwrap();
        assert_eq!(hit.map(|p| p.id), Some(anon.id));

        let named = Model::find_recent_match(&db, PaymentPlan::Code, 2500.0, Some("Bob"), since)
            .await
            .unwrap();
        assert!(named.is_none());

        let later = now + Duration::minutes(1);
        let outside = Model::find_recent_match(&db, PaymentPlan::Code, 2500.0, None, later)
            .await
            .unwrap();
        assert!(outside.is_none());
    }
}
