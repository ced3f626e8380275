use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors::{self, ModelError}, facility};

pub const RESOURCE_TYPES: &[&str] = &["ROOM", "EQUIPMENT", "VEHICLE", "OTHER"];
pub const STATUSES: &[&str] = &["AVAILABLE", "IN_USE", "UNDER_MAINTENANCE", "RETIRED"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "resource")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub resource_type: String,
    pub location: Option<String>,
    pub capacity: Option<i32>,
    pub available: bool,
    pub opening_time: Option<Time>,
    pub closing_time: Option<Time>,
    pub image_url: Option<String>,
    pub specifications: Option<String>,
    pub status: String,
    pub booking_rules: Option<String>,
    pub restrictions: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NewResource {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub resource_type: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub capacity: Option<i32>,
    #[serde(default = "default_true")]
    pub available: bool,
    #[serde(default)]
    pub opening_time: Option<Time>,
    #[serde(default)]
    pub closing_time: Option<Time>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub specifications: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub booking_rules: Option<String>,
    #[serde(default)]
    pub restrictions: Option<String>,
}

fn default_true() -> bool { true }

pub async fn create(db: &DatabaseConnection, input: NewResource) -> Result<Model, ModelError> {
    errors::require("name", &input.name)?;
    let resource_type = errors::one_of("resource_type", &input.resource_type, RESOURCE_TYPES)?;
    let status = errors::one_of("status", input.status.as_deref().unwrap_or("AVAILABLE"), STATUSES)?;
    facility::validate_hours(input.opening_time, input.closing_time)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name.trim().to_string()),
        description: Set(input.description),
        resource_type: Set(resource_type),
        location: Set(input.location),
        capacity: Set(input.capacity),
        available: Set(input.available),
        opening_time: Set(input.opening_time),
        closing_time: Set(input.closing_time),
        image_url: Set(input.image_url),
        specifications: Set(input.specifications),
        status: Set(status),
        booking_rules: Set(input.booking_rules),
        restrictions: Set(input.restrictions),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}
