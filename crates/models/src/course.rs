use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::{self, ModelError};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "course")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub course_code: String,
    pub description: Option<String>,
    pub department: Option<String>,
    pub credits: i32,
    pub semester: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub capacity: Option<i32>,
    pub location: Option<String>,
    pub schedule: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Fields accepted when creating or fully replacing a course.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NewCourse {
    pub name: String,
    pub course_code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub credits: i32,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub start_date: Option<Date>,
    #[serde(default)]
    pub end_date: Option<Date>,
    #[serde(default)]
    pub capacity: Option<i32>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub schedule: Option<String>,
}

impl NewCourse {
    pub fn validate(&self) -> Result<(), ModelError> {
        errors::require("name", &self.name)?;
        errors::require("course_code", &self.course_code)?;
        if !(0..=30).contains(&self.credits) {
            return Err(ModelError::Validation("credits must be within 0..=30".into()));
        }
        if matches!(self.capacity, Some(c) if c < 1) {
            return Err(ModelError::Validation("capacity must be >= 1".into()));
        }
        if let (Some(s), Some(e)) = (self.start_date, self.end_date) {
            if s > e { return Err(ModelError::Validation("start_date must not be after end_date".into())); }
        }
        Ok(())
    }
}

pub fn normalize_code(code: &str) -> String { code.trim().to_ascii_uppercase() }

pub async fn create(db: &DatabaseConnection, input: NewCourse) -> Result<Model, ModelError> {
    input.validate()?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name.trim().to_string()),
        course_code: Set(normalize_code(&input.course_code)),
        description: Set(input.description),
        department: Set(input.department),
        credits: Set(input.credits),
        semester: Set(input.semester),
        start_date: Set(input.start_date),
        end_date: Set(input.end_date),
        capacity: Set(input.capacity),
        location: Set(input.location),
        schedule: Set(input.schedule),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course() -> NewCourse {
        NewCourse {
            name: "Operating Systems".into(),
            course_code: "cs-330".into(),
            description: None,
            department: Some("CS".into()),
            credits: 4,
            semester: Some("FALL".into()),
            start_date: None,
            end_date: None,
            capacity: Some(40),
            location: None,
            schedule: None,
        }
    }

    #[test]
    fn valid_course_passes() {
        assert!(course().validate().is_ok());
        assert_eq!(normalize_code(" cs-330 "), "CS-330");
    }

    #[test]
    fn rejects_bad_capacity_and_dates() {
        let mut c = course();
        c.capacity = Some(0);
        assert!(c.validate().is_err());

        let mut c = course();
        c.start_date = chrono::NaiveDate::from_ymd_opt(2024, 12, 1);
        c.end_date = chrono::NaiveDate::from_ymd_opt(2024, 9, 1);
        assert!(c.validate().is_err());
    }
}
