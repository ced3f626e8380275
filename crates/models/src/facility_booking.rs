use sea_orm::{entity::prelude::*, Set, ConnectionTrait};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors::{self, ModelError}, facility, schedule, user};

pub const STATUS_CONFIRMED: &str = "CONFIRMED";
pub const STATUS_CANCELLED: &str = "CANCELLED";
pub const STATUSES: &[&str] = &[STATUS_CONFIRMED, STATUS_CANCELLED];

/// A facility reserved by a teacher for one time window on one calendar date.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "facility_booking")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub facility_id: Uuid,
    pub teacher_id: Uuid,
    pub purpose: String,
    pub date: Date,
    pub start_time: Time,
    pub end_time: Time,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Facility,
    Teacher,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Facility => Entity::belongs_to(facility::Entity).from(Column::FacilityId).to(facility::Column::Id).into(),
            Relation::Teacher => Entity::belongs_to(user::Entity).from(Column::TeacherId).to(user::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether this booking blocks `[start, end]` on `date`.
    pub fn clashes_with(&self, date: Date, start: Time, end: Time) -> bool {
        self.status != STATUS_CANCELLED && self.date == date && schedule::overlaps(self.start_time, self.end_time, start, end)
    }
}

/// Requested slot for a new or updated booking.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct BookingSlot {
    pub facility_id: Uuid,
    pub date: Date,
    pub start_time: Time,
    pub end_time: Time,
    pub purpose: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl BookingSlot {
    pub fn validate(&self) -> Result<(), ModelError> {
        errors::require("purpose", &self.purpose)?;
        schedule::validate_range(self.start_time, self.end_time)
    }
}

/// Conflicting bookings for `facility_id` on `date`, ignoring cancelled ones and `exclude`.
pub async fn find_conflicts<C: ConnectionTrait>(
    db: &C,
    facility_id: Uuid,
    date: Date,
    start: Time,
    end: Time,
    exclude: Option<Uuid>,
) -> Result<Vec<Model>, ModelError> {
    let mut q = Entity::find()
        .filter(Column::FacilityId.eq(facility_id))
        .filter(Column::Date.eq(date))
        .filter(Column::Status.ne(STATUS_CANCELLED))
        .filter(Column::StartTime.lte(end))
        .filter(Column::EndTime.gte(start));
    if let Some(id) = exclude {
        q = q.filter(Column::Id.ne(id));
    }
    q.all(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn create<C: ConnectionTrait>(db: &C, teacher_id: Uuid, slot: BookingSlot) -> Result<Model, ModelError> {
    slot.validate()?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        facility_id: Set(slot.facility_id),
        teacher_id: Set(teacher_id),
        purpose: Set(slot.purpose.trim().to_string()),
        date: Set(slot.date),
        start_time: Set(slot.start_time),
        end_time: Set(slot.end_time),
        status: Set(STATUS_CONFIRMED.to_string()),
        notes: Set(slot.notes),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn t(h: u32, m: u32) -> NaiveTime { NaiveTime::from_hms_opt(h, m, 0).unwrap() }

    fn booking(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Model {
        let now = Utc::now().into();
        Model {
            id: Uuid::new_v4(),
            facility_id: Uuid::new_v4(),
            teacher_id: Uuid::new_v4(),
            purpose: "Lecture".into(),
            date,
            start_time: start,
            end_time: end,
            status: STATUS_CONFIRMED.into(),
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn clash_requires_same_date() {
        let d = NaiveDate::from_ymd_opt(2024, 9, 2).unwrap();
        let b = booking(d, t(9, 0), t(10, 0));
        assert!(b.clashes_with(d, t(9, 30), t(11, 0)));
        assert!(!b.clashes_with(d.succ_opt().unwrap(), t(9, 30), t(11, 0)));
    }

    #[test]
    fn cancelled_booking_never_clashes() {
        let d = NaiveDate::from_ymd_opt(2024, 9, 2).unwrap();
        let mut b = booking(d, t(9, 0), t(10, 0));
        b.status = STATUS_CANCELLED.into();
        assert!(!b.clashes_with(d, t(9, 0), t(10, 0)));
    }

    #[test]
    fn slot_validation() {
        let slot = BookingSlot {
            facility_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 9, 2).unwrap(),
            start_time: t(11, 0),
            end_time: t(10, 0),
            purpose: "Lab".into(),
            notes: None,
        };
        assert!(slot.validate().is_err());
    }
}
