use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors::{self, ModelError}, user};

pub const STATUS_PENDING: &str = "PENDING";
pub const STATUS_RESOLVED: &str = "RESOLVED";
pub const STATUSES: &[&str] = &[STATUS_PENDING, "IN_PROGRESS", STATUS_RESOLVED, "CLOSED"];
pub const CATEGORIES: &[&str] = &["ACADEMIC", "FACILITY", "CAFETERIA", "TRANSPORT", "ADMINISTRATION", "OTHER"];
pub const PRIORITIES: &[&str] = &["LOW", "MEDIUM", "HIGH"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "feedback")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub subject: String,
    pub message: String,
    pub category: String,
    pub status: String,
    pub priority: String,
    pub response: Option<String>,
    pub responded_by: Option<Uuid>,
    pub response_time: Option<DateTimeWithTimeZone>,
    pub submission_time: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { User }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity).from(Column::UserId).to(user::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NewFeedback {
    pub subject: String,
    pub message: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_priority")]
    pub priority: String,
}

fn default_category() -> String { "OTHER".into() }
fn default_priority() -> String { "MEDIUM".into() }

pub async fn create(db: &DatabaseConnection, user_id: Uuid, input: NewFeedback) -> Result<Model, ModelError> {
    errors::require("subject", &input.subject)?;
    errors::require("message", &input.message)?;
    let category = errors::one_of("category", &input.category, CATEGORIES)?;
    let priority = errors::one_of("priority", &input.priority, PRIORITIES)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        subject: Set(input.subject.trim().to_string()),
        message: Set(input.message),
        category: Set(category),
        status: Set(STATUS_PENDING.to_string()),
        priority: Set(priority),
        response: Set(None),
        responded_by: Set(None),
        response_time: Set(None),
        submission_time: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}
