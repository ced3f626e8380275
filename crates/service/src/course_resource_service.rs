use uuid::Uuid;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use models::course_resource::{self, NewCourseResource};
use crate::{course_service, errors::ServiceError};

/// Attach a material record to an existing course.
pub async fn create_resource(
    db: &DatabaseConnection,
    input: NewCourseResource,
    uploaded_by: Option<Uuid>,
) -> Result<course_resource::Model, ServiceError> {
    course_service::get_course(db, input.course_id).await?;
    Ok(course_resource::create(db, input, uploaded_by).await?)
}

pub async fn get_resource(db: &DatabaseConnection, id: Uuid) -> Result<course_resource::Model, ServiceError> {
    course_resource::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("course resource"))
}

/// Materials of a course, newest first.
pub async fn list_by_course(db: &DatabaseConnection, course_id: Uuid) -> Result<Vec<course_resource::Model>, ServiceError> {
    Ok(course_resource::Entity::find()
        .filter(course_resource::Column::CourseId.eq(course_id))
        .order_by_desc(course_resource::Column::UploadDate)
        .all(db)
        .await?)
}

pub async fn delete_resource(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    if course_resource::Entity::delete_by_id(id).exec(db).await?.rows_affected == 0 {
        return Err(ServiceError::not_found("course resource"));
    }
    Ok(())
}
