use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{course, errors::ModelError, user};

/// Faculty assignment to a course.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "course_teacher")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub course_id: Uuid,
    pub teacher_id: Uuid,
    pub assigned_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Course,
    Teacher,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Course => Entity::belongs_to(course::Entity).from(Column::CourseId).to(course::Column::Id).into(),
            Relation::Teacher => Entity::belongs_to(user::Entity).from(Column::TeacherId).to(user::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(db: &DatabaseConnection, course_id: Uuid, teacher_id: Uuid) -> Result<Model, ModelError> {
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        course_id: Set(course_id),
        teacher_id: Set(teacher_id),
        assigned_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn exists(db: &DatabaseConnection, course_id: Uuid, teacher_id: Uuid) -> Result<bool, ModelError> {
    let found = Entity::find()
        .filter(Column::CourseId.eq(course_id))
        .filter(Column::TeacherId.eq(teacher_id))
        .one(db)
        .await?;
    Ok(found.is_some())
}
