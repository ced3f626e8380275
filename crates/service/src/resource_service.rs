use uuid::Uuid;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use models::errors;
use models::facility::validate_hours;
use models::resource::{self, NewResource};
use crate::errors::ServiceError;

pub async fn create_resource(db: &DatabaseConnection, input: NewResource) -> Result<resource::Model, ServiceError> {
    Ok(resource::create(db, input).await?)
}

/// Replace all editable fields of a resource.
pub async fn update_resource(db: &DatabaseConnection, id: Uuid, input: NewResource) -> Result<resource::Model, ServiceError> {
    errors::require("name", &input.name)?;
    let resource_type = errors::one_of("resource_type", &input.resource_type, resource::RESOURCE_TYPES)?;
    validate_hours(input.opening_time, input.closing_time)?;
    let mut am: resource::ActiveModel = get_resource(db, id).await?.into();
    if let Some(status) = input.status.as_deref() {
        am.status = Set(errors::one_of("status", status, resource::STATUSES)?);
    }
    am.name = Set(input.name.trim().to_string());
    am.description = Set(input.description);
    am.resource_type = Set(resource_type);
    am.location = Set(input.location);
    am.capacity = Set(input.capacity);
    am.available = Set(input.available);
    am.opening_time = Set(input.opening_time);
    am.closing_time = Set(input.closing_time);
    am.image_url = Set(input.image_url);
    am.specifications = Set(input.specifications);
    am.booking_rules = Set(input.booking_rules);
    am.restrictions = Set(input.restrictions);
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn get_resource(db: &DatabaseConnection, id: Uuid) -> Result<resource::Model, ServiceError> {
    resource::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("resource"))
}

pub async fn list_resources(db: &DatabaseConnection) -> Result<Vec<resource::Model>, ServiceError> {
    Ok(resource::Entity::find().order_by_asc(resource::Column::Name).all(db).await?)
}

pub async fn by_type(db: &DatabaseConnection, resource_type: &str) -> Result<Vec<resource::Model>, ServiceError> {
    let t = errors::one_of("resource_type", resource_type, resource::RESOURCE_TYPES)?;
    Ok(resource::Entity::find()
        .filter(resource::Column::ResourceType.eq(t))
        .order_by_asc(resource::Column::Name)
        .all(db)
        .await?)
}

pub async fn list_available(db: &DatabaseConnection) -> Result<Vec<resource::Model>, ServiceError> {
    Ok(resource::Entity::find()
        .filter(resource::Column::Available.eq(true))
        .order_by_asc(resource::Column::Name)
        .all(db)
        .await?)
}

/// Toggle the availability flag only.
pub async fn update_availability(db: &DatabaseConnection, id: Uuid, available: bool) -> Result<resource::Model, ServiceError> {
    let mut am: resource::ActiveModel = get_resource(db, id).await?.into();
    am.available = Set(available);
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn delete_resource(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    if resource::Entity::delete_by_id(id).exec(db).await?.rows_affected == 0 {
        return Err(ServiceError::not_found("resource"));
    }
    Ok(())
}
