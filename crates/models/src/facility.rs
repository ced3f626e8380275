use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::{self, ModelError};

pub const FACILITY_TYPES: &[&str] = &["CLASSROOM", "LAB", "LIBRARY", "SPORTS", "OTHER"];
pub const STATUSES: &[&str] = &["AVAILABLE", "UNDER_MAINTENANCE", "CLOSED"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "facility")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub location: String,
    pub facility_type: String,
    pub capacity: Option<i32>,
    pub available: bool,
    pub opening_time: Option<Time>,
    pub closing_time: Option<Time>,
    pub image_url: Option<String>,
    pub amenities: Option<String>,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Bookable means flagged available and not closed or under maintenance.
    pub fn is_bookable(&self) -> bool { self.available && self.status == "AVAILABLE" }

    /// True when `[start, end]` fits inside opening hours (unbounded when hours are unset).
    pub fn within_hours(&self, start: Time, end: Time) -> bool {
        self.opening_time.map_or(true, |o| start >= o) && self.closing_time.map_or(true, |c| end <= c)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NewFacility {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub location: String,
    pub facility_type: String,
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
    pub amenities: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

fn default_true() -> bool { true }

pub fn validate_hours(opening: Option<Time>, closing: Option<Time>) -> Result<(), ModelError> {
    if let (Some(o), Some(c)) = (opening, closing) {
        if o >= c { return Err(ModelError::Validation("opening_time must be before closing_time".into())); }
    }
    Ok(())
}

pub async fn create(db: &DatabaseConnection, input: NewFacility) -> Result<Model, ModelError> {
    errors::require("name", &input.name)?;
    errors::require("location", &input.location)?;
    let facility_type = errors::one_of("facility_type", &input.facility_type, FACILITY_TYPES)?;
    let status = errors::one_of("status", input.status.as_deref().unwrap_or("AVAILABLE"), STATUSES)?;
    if matches!(input.capacity, Some(c) if c < 1) {
        return Err(ModelError::Validation("capacity must be >= 1".into()));
    }
    validate_hours(input.opening_time, input.closing_time)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name.trim().to_string()),
        description: Set(input.description),
        location: Set(input.location.trim().to_string()),
        facility_type: Set(facility_type),
        capacity: Set(input.capacity),
        available: Set(input.available),
        opening_time: Set(input.opening_time),
        closing_time: Set(input.closing_time),
        image_url: Set(input.image_url),
        amenities: Set(input.amenities),
        status: Set(status),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn t(h: u32) -> NaiveTime { NaiveTime::from_hms_opt(h, 0, 0).unwrap() }

    fn lab() -> Model {
        let now = Utc::now().into();
        Model {
            id: Uuid::new_v4(),
            name: "Lab 1".into(),
            description: None,
            location: "B-101".into(),
            facility_type: "LAB".into(),
            capacity: Some(30),
            available: true,
            opening_time: Some(t(8)),
            closing_time: Some(t(18)),
            image_url: None,
            amenities: None,
            status: "AVAILABLE".into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn hours_bound_bookings() {
        let f = lab();
        assert!(f.within_hours(t(8), t(10)));
        assert!(!f.within_hours(t(7), t(9)));
        assert!(!f.within_hours(t(17), t(19)));
    }

    #[test]
    fn maintenance_is_not_bookable() {
        let mut f = lab();
        assert!(f.is_bookable());
        f.status = "UNDER_MAINTENANCE".into();
        assert!(!f.is_bookable());
    }

    #[test]
    fn hours_must_be_ordered() {
        assert!(validate_hours(Some(t(18)), Some(t(8))).is_err());
        assert!(validate_hours(None, Some(t(8))).is_ok());
    }
}
