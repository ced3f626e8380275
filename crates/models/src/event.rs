use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors::{self, ModelError}, schedule, user};

pub const STATUS_UPCOMING: &str = "UPCOMING";
pub const STATUSES: &[&str] = &[STATUS_UPCOMING, "ONGOING", "COMPLETED", "CANCELLED"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTimeWithTimeZone,
    pub end_time: DateTimeWithTimeZone,
    pub location: Option<String>,
    pub organizer_id: Uuid,
    pub status: String,
    pub image_url: Option<String>,
    pub max_participants: Option<i32>,
    pub registration_deadline: Option<DateTimeWithTimeZone>,
    pub event_type: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Organizer }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Organizer => Entity::belongs_to(user::Entity).from(Column::OrganizerId).to(user::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Registration is open until the deadline, or until the event starts when no deadline is set.
    pub fn registration_open(&self, now: DateTimeWithTimeZone) -> bool {
        self.status == STATUS_UPCOMING && now <= self.registration_deadline.unwrap_or(self.start_time)
    }

    pub fn is_full(&self, registered: u64) -> bool {
        matches!(self.max_participants, Some(max) if registered >= max as u64)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NewEvent {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_time: DateTimeWithTimeZone,
    pub end_time: DateTimeWithTimeZone,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub max_participants: Option<i32>,
    #[serde(default)]
    pub registration_deadline: Option<DateTimeWithTimeZone>,
    #[serde(default)]
    pub event_type: Option<String>,
}

impl NewEvent {
    pub fn validate(&self) -> Result<(), ModelError> {
        errors::require("title", &self.title)?;
        schedule::validate_range(self.start_time, self.end_time)?;
        if matches!(self.max_participants, Some(m) if m < 1) {
            return Err(ModelError::Validation("max_participants must be >= 1".into()));
        }
        if matches!(self.registration_deadline, Some(d) if d > self.start_time) {
            return Err(ModelError::Validation("registration_deadline must not be after start_time".into()));
        }
        Ok(())
    }
}

pub async fn create(db: &DatabaseConnection, organizer_id: Uuid, input: NewEvent) -> Result<Model, ModelError> {
    input.validate()?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(input.title.trim().to_string()),
        description: Set(input.description),
        start_time: Set(input.start_time),
        end_time: Set(input.end_time),
        location: Set(input.location),
        organizer_id: Set(organizer_id),
        status: Set(STATUS_UPCOMING.to_string()),
        image_url: Set(input.image_url),
        max_participants: Set(input.max_participants),
        registration_deadline: Set(input.registration_deadline),
        event_type: Set(input.event_type),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn event(max: Option<i32>) -> Model {
        let now: DateTimeWithTimeZone = Utc::now().into();
        Model {
            id: Uuid::new_v4(),
            title: "Hackathon".into(),
            description: None,
            start_time: now + Duration::days(7),
            end_time: now + Duration::days(8),
            location: None,
            organizer_id: Uuid::new_v4(),
            status: STATUS_UPCOMING.into(),
            image_url: None,
            max_participants: max,
            registration_deadline: Some(now + Duration::days(5)),
            event_type: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn capacity_check() {
        let e = event(Some(2));
        assert!(!e.is_full(1));
        assert!(e.is_full(2));
        assert!(!event(None).is_full(10_000));
    }

    #[test]
    fn deadline_closes_registration() {
        let e = event(None);
        let now: DateTimeWithTimeZone = Utc::now().into();
        assert!(e.registration_open(now));
        assert!(!e.registration_open(now + Duration::days(6)));
    }
}
