use sea_orm::{entity::prelude::*, Set, ConnectionTrait};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{course, errors::{self, ModelError}, user};

pub const STATUS_PRESENT: &str = "PRESENT";
pub const STATUSES: &[&str] = &[STATUS_PRESENT, "ABSENT", "LATE", "EXCUSED"];

/// One student's attendance for one course on one calendar day.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attendance")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub date: Date,
    pub status: String,
    pub remarks: Option<String>,
    pub recorded_by: Option<Uuid>,
    pub recorded_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Student,
    Course,
    Recorder,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Student => Entity::belongs_to(user::Entity).from(Column::StudentId).to(user::Column::Id).into(),
            Relation::Course => Entity::belongs_to(course::Entity).from(Column::CourseId).to(course::Column::Id).into(),
            Relation::Recorder => Entity::belongs_to(user::Entity).from(Column::RecordedBy).to(user::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_present(&self) -> bool { self.status.eq_ignore_ascii_case(STATUS_PRESENT) }
}

pub fn validate_status(status: &str) -> Result<String, ModelError> {
    errors::one_of("status", status, STATUSES)
}

/// Persist a record built by the caller; used by both single and bulk writes.
pub async fn insert<C: ConnectionTrait>(db: &C, record: Model) -> Result<Model, ModelError> {
    let am = ActiveModel {
        id: Set(record.id),
        student_id: Set(record.student_id),
        course_id: Set(record.course_id),
        date: Set(record.date),
        status: Set(record.status),
        remarks: Set(record.remarks),
        recorded_by: Set(record.recorded_by),
        recorded_at: Set(record.recorded_at),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

/// Build a fresh record stamped with the current time.
pub fn new_record(student_id: Uuid, course_id: Uuid, date: Date, status: String, remarks: Option<String>, recorded_by: Option<Uuid>) -> Model {
    Model {
        id: Uuid::new_v4(),
        student_id,
        course_id,
        date,
        status,
        remarks,
        recorded_by,
        recorded_at: Utc::now().into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_is_case_insensitive() {
        let mut r = new_record(Uuid::new_v4(), Uuid::new_v4(), Utc::now().date_naive(), "present".into(), None, None);
        assert!(r.is_present());
        r.status = "ABSENT".into();
        assert!(!r.is_present());
    }

    #[test]
    fn status_is_normalized() {
        assert_eq!(validate_status("late").unwrap(), "LATE");
        assert!(validate_status("skipped").is_err());
    }
}
