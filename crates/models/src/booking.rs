use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, resource, schedule, user};

pub const STATUS_PENDING: &str = "PENDING";
pub const STATUS_CANCELLED: &str = "CANCELLED";
pub const STATUS_REJECTED: &str = "REJECTED";
pub const STATUSES: &[&str] = &[STATUS_PENDING, "APPROVED", STATUS_REJECTED, STATUS_CANCELLED, "COMPLETED"];

/// Resource reservation over an absolute time range.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "booking")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub resource_id: Uuid,
    pub start_time: DateTimeWithTimeZone,
    pub end_time: DateTimeWithTimeZone,
    pub status: String,
    pub purpose: Option<String>,
    pub remarks: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
    Resource,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity).from(Column::UserId).to(user::Column::Id).into(),
            Relation::Resource => Entity::belongs_to(resource::Entity).from(Column::ResourceId).to(resource::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Cancelled and rejected bookings release their slot.
pub fn holds_slot(status: &str) -> bool { status != STATUS_CANCELLED && status != STATUS_REJECTED }

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NewBooking {
    pub resource_id: Uuid,
    pub start_time: DateTimeWithTimeZone,
    pub end_time: DateTimeWithTimeZone,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// Active bookings of `resource_id` overlapping `[start, end]`, minus `exclude`.
pub async fn find_conflicts(
    db: &DatabaseConnection,
    resource_id: Uuid,
    start: DateTimeWithTimeZone,
    end: DateTimeWithTimeZone,
    exclude: Option<Uuid>,
) -> Result<Vec<Model>, ModelError> {
    let mut q = Entity::find()
        .filter(Column::ResourceId.eq(resource_id))
        .filter(Column::Status.is_not_in([STATUS_CANCELLED, STATUS_REJECTED]))
        .filter(Column::StartTime.lte(end))
        .filter(Column::EndTime.gte(start));
    if let Some(id) = exclude {
        q = q.filter(Column::Id.ne(id));
    }
    q.all(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn create(db: &DatabaseConnection, user_id: Uuid, input: NewBooking) -> Result<Model, ModelError> {
    schedule::validate_range(input.start_time, input.end_time)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        resource_id: Set(input.resource_id),
        start_time: Set(input.start_time),
        end_time: Set(input.end_time),
        status: Set(STATUS_PENDING.to_string()),
        purpose: Set(input.purpose),
        remarks: Set(input.remarks),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}
