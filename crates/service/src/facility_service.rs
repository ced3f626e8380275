use uuid::Uuid;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use models::errors;
use models::facility::{self, NewFacility};
use crate::errors::ServiceError;

pub async fn create_facility(db: &DatabaseConnection, input: NewFacility) -> Result<facility::Model, ServiceError> {
    Ok(facility::create(db, input).await?)
}

/// Replace all editable fields of a facility.
pub async fn update_facility(db: &DatabaseConnection, id: Uuid, input: NewFacility) -> Result<facility::Model, ServiceError> {
    errors::require("name", &input.name)?;
    errors::require("location", &input.location)?;
    let facility_type = errors::one_of("facility_type", &input.facility_type, facility::FACILITY_TYPES)?;
    facility::validate_hours(input.opening_time, input.closing_time)?;
    let mut am: facility::ActiveModel = get_facility(db, id).await?.into();
    if let Some(status) = input.status.as_deref() {
        am.status = Set(errors::one_of("status", status, facility::STATUSES)?);
    }
    am.name = Set(input.name.trim().to_string());
    am.description = Set(input.description);
    am.location = Set(input.location.trim().to_string());
    am.facility_type = Set(facility_type);
    am.capacity = Set(input.capacity);
    am.available = Set(input.available);
    am.opening_time = Set(input.opening_time);
    am.closing_time = Set(input.closing_time);
    am.image_url = Set(input.image_url);
    am.amenities = Set(input.amenities);
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn get_facility(db: &DatabaseConnection, id: Uuid) -> Result<facility::Model, ServiceError> {
    facility::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("facility"))
}

pub async fn list_facilities(db: &DatabaseConnection) -> Result<Vec<facility::Model>, ServiceError> {
    Ok(facility::Entity::find().order_by_asc(facility::Column::Name).all(db).await?)
}

/// Facilities that can currently be booked.
pub async fn list_available(db: &DatabaseConnection) -> Result<Vec<facility::Model>, ServiceError> {
    Ok(facility::Entity::find()
        .filter(facility::Column::Available.eq(true))
        .filter(facility::Column::Status.eq("AVAILABLE"))
        .order_by_asc(facility::Column::Name)
        .all(db)
        .await?)
}

pub async fn delete_facility(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    if facility::Entity::delete_by_id(id).exec(db).await?.rows_affected == 0 {
        return Err(ServiceError::not_found("facility"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn facility_crud_service() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let input = NewFacility {
            name: format!("Gym {}", Uuid::new_v4()),
            description: None,
            location: "North".into(),
            facility_type: "sports".into(),
            capacity: Some(100),
            available: true,
            opening_time: None,
            closing_time: None,
            image_url: None,
            amenities: None,
            status: None,
        };
        let f = create_facility(&db, input.clone()).await?;
        assert!(list_available(&db).await?.iter().any(|x| x.id == f.id));

        let closed = update_facility(&db, f.id, NewFacility { status: Some("closed".into()), ..input }).await?;
        assert_eq!(closed.status, "CLOSED");
        assert!(!list_available(&db).await?.iter().any(|x| x.id == f.id));

        delete_facility(&db, f.id).await?;
        assert!(matches!(get_facility(&db, f.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }
}
