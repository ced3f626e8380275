use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors::{self, ModelError}, user};

pub const STATUS_LOST: &str = "LOST";
pub const STATUS_FOUND: &str = "FOUND";
pub const STATUS_CLAIMED: &str = "CLAIMED";
pub const STATUS_RETURNED: &str = "RETURNED";
pub const STATUSES: &[&str] = &[STATUS_LOST, STATUS_FOUND, STATUS_CLAIMED, STATUS_RETURNED];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lost_found_item")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub item_name: String,
    pub description: Option<String>,
    pub location_found: Option<String>,
    pub date_found: Option<DateTimeWithTimeZone>,
    pub found_by: Option<Uuid>,
    pub claimed_by: Option<Uuid>,
    pub status: String,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub claim_date: Option<DateTimeWithTimeZone>,
    pub verification_details: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Finder,
    Claimer,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Finder => Entity::belongs_to(user::Entity).from(Column::FoundBy).to(user::Column::Id).into(),
            Relation::Claimer => Entity::belongs_to(user::Entity).from(Column::ClaimedBy).to(user::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Only items still lost or found can be claimed.
    pub fn claimable(&self) -> bool { self.status == STATUS_LOST || self.status == STATUS_FOUND }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NewLostFoundItem {
    pub item_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location_found: Option<String>,
    #[serde(default)]
    pub date_found: Option<DateTimeWithTimeZone>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

fn default_status() -> String { STATUS_FOUND.into() }

pub async fn create(db: &DatabaseConnection, reporter: Uuid, input: NewLostFoundItem) -> Result<Model, ModelError> {
    errors::require("item_name", &input.item_name)?;
    let status = errors::one_of("status", &input.status, &[STATUS_LOST, STATUS_FOUND])?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        item_name: Set(input.item_name.trim().to_string()),
        description: Set(input.description),
        location_found: Set(input.location_found),
        date_found: Set(input.date_found),
        found_by: Set(Some(reporter)),
        claimed_by: Set(None),
        status: Set(status),
        category: Set(input.category),
        image_url: Set(input.image_url),
        claim_date: Set(None),
        verification_details: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}
