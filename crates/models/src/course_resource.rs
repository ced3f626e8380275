use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{course, errors::{self, ModelError}};

pub const RESOURCE_TYPES: &[&str] = &["LECTURE_NOTES", "ASSIGNMENT", "SLIDES", "VIDEO", "READING", "OTHER"];

/// Course material metadata; `file_path` points at storage managed outside this service.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "course_resource")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub file_path: String,
    pub resource_type: String,
    pub uploaded_by: Option<Uuid>,
    pub upload_date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Course }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Course => Entity::belongs_to(course::Entity).from(Column::CourseId).to(course::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NewCourseResource {
    pub course_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub file_path: String,
    #[serde(default = "default_resource_type")]
    pub resource_type: String,
}

fn default_resource_type() -> String { "OTHER".into() }

pub async fn create(db: &DatabaseConnection, input: NewCourseResource, uploaded_by: Option<Uuid>) -> Result<Model, ModelError> {
    errors::require("title", &input.title)?;
    errors::require("file_path", &input.file_path)?;
    let resource_type = errors::one_of("resource_type", &input.resource_type, RESOURCE_TYPES)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        course_id: Set(input.course_id),
        title: Set(input.title.trim().to_string()),
        description: Set(input.description),
        file_path: Set(input.file_path.trim().to_string()),
        resource_type: Set(resource_type),
        uploaded_by: Set(uploaded_by),
        upload_date: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}
