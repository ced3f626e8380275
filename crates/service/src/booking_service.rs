//! Resource bookings: absolute time ranges, same overlap rule as facility bookings.

use uuid::Uuid;
use chrono::Utc;
use common::metrics::{BOOKINGS_CREATED_TOTAL, BOOKING_CONFLICTS_TOTAL};
use sea_orm::{
    prelude::DateTimeWithTimeZone, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::{info, warn};

use models::booking::{self, NewBooking};
use models::{errors, schedule};
use crate::{errors::ServiceError, resource_service};

async fn ensure_free(
    db: &DatabaseConnection,
    resource_id: Uuid,
    start: DateTimeWithTimeZone,
    end: DateTimeWithTimeZone,
    exclude: Option<Uuid>,
) -> Result<(), ServiceError> {
    if !booking::find_conflicts(db, resource_id, start, end, exclude).await?.is_empty() {
        BOOKING_CONFLICTS_TOTAL.inc();
        warn!(resource_id = %resource_id, "booking_conflict");
        return Err(ServiceError::conflict("resource is already booked for the selected time range"));
    }
    Ok(())
}

async fn ensure_bookable(db: &DatabaseConnection, resource_id: Uuid) -> Result<(), ServiceError> {
    let r = resource_service::get_resource(db, resource_id).await?;
    if !r.available {
        return Err(ServiceError::Validation(format!("resource {} is not available for booking", r.name)));
    }
    Ok(())
}

/// Request a resource; the booking starts PENDING.
pub async fn create_booking(db: &DatabaseConnection, user_id: Uuid, input: NewBooking) -> Result<booking::Model, ServiceError> {
    schedule::validate_range(input.start_time, input.end_time)?;
    ensure_bookable(db, input.resource_id).await?;
    ensure_free(db, input.resource_id, input.start_time, input.end_time, None).await?;
    let created = booking::create(db, user_id, input).await?;
    BOOKINGS_CREATED_TOTAL.inc();
    info!(booking_id = %created.id, resource_id = %created.resource_id, "resource_booking_created");
    Ok(created)
}

/// Move a booking to another range or resource; it never conflicts with itself.
pub async fn update_booking(db: &DatabaseConnection, id: Uuid, input: NewBooking) -> Result<booking::Model, ServiceError> {
    schedule::validate_range(input.start_time, input.end_time)?;
    let current = get_booking(db, id).await?;
    if !booking::holds_slot(&current.status) {
        return Err(ServiceError::Validation(format!("{} bookings cannot be changed", current.status.to_lowercase())));
    }
    if current.resource_id != input.resource_id {
        ensure_bookable(db, input.resource_id).await?;
    }
    ensure_free(db, input.resource_id, input.start_time, input.end_time, Some(id)).await?;
    let mut am: booking::ActiveModel = current.into();
    am.resource_id = Set(input.resource_id);
    am.start_time = Set(input.start_time);
    am.end_time = Set(input.end_time);
    am.purpose = Set(input.purpose);
    am.remarks = Set(input.remarks);
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

/// Set a new status. Reviving a released booking re-checks its slot.
pub async fn update_status(db: &DatabaseConnection, id: Uuid, status: &str) -> Result<booking::Model, ServiceError> {
    let status = errors::one_of("status", status, booking::STATUSES)?;
    let current = get_booking(db, id).await?;
    if !booking::holds_slot(&current.status) && booking::holds_slot(&status) {
        ensure_free(db, current.resource_id, current.start_time, current.end_time, Some(id)).await?;
    }
    let mut am: booking::ActiveModel = current.into();
    am.status = Set(status);
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn get_booking(db: &DatabaseConnection, id: Uuid) -> Result<booking::Model, ServiceError> {
    booking::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("booking"))
}

pub async fn by_user(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<booking::Model>, ServiceError> {
    Ok(booking::Entity::find()
        .filter(booking::Column::UserId.eq(user_id))
        .order_by_asc(booking::Column::StartTime)
        .all(db)
        .await?)
}

pub async fn by_resource(db: &DatabaseConnection, resource_id: Uuid) -> Result<Vec<booking::Model>, ServiceError> {
    Ok(booking::Entity::find()
        .filter(booking::Column::ResourceId.eq(resource_id))
        .order_by_asc(booking::Column::StartTime)
        .all(db)
        .await?)
}

/// Bookings whose range touches `[from, to]`.
pub async fn by_date_range(
    db: &DatabaseConnection,
    from: DateTimeWithTimeZone,
    to: DateTimeWithTimeZone,
) -> Result<Vec<booking::Model>, ServiceError> {
    if from > to {
        return Err(ServiceError::Validation("start must not be after end".into()));
    }
    Ok(booking::Entity::find()
        .filter(booking::Column::StartTime.lte(to))
        .filter(booking::Column::EndTime.gte(from))
        .order_by_asc(booking::Column::StartTime)
        .all(db)
        .await?)
}

pub async fn delete_booking(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    if booking::Entity::delete_by_id(id).exec(db).await?.rows_affected == 0 {
        return Err(ServiceError::not_found("booking"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, user_with_role};
    use chrono::{Duration, TimeZone};
    use models::resource::NewResource;
    use models::user::Role;

    #[tokio::test]
    async fn resource_booking_conflicts() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let user = user_with_role(&db, Role::Student).await?;
        let projector = resource_service::create_resource(&db, NewResource {
            name: format!("Projector {}", Uuid::new_v4()),
            description: None,
            resource_type: "equipment".into(),
            location: None,
            capacity: None,
            available: true,
            opening_time: None,
            closing_time: None,
            image_url: None,
            specifications: None,
            status: None,
            booking_rules: None,
            restrictions: None,
        })
        .await?;

        let at = |h: i64| -> DateTimeWithTimeZone { (Utc.with_ymd_and_hms(2031, 5, 1, 0, 0, 0).unwrap() + Duration::hours(h)).into() };
        let req = |s, e| NewBooking { resource_id: projector.id, start_time: at(s), end_time: at(e), purpose: None, remarks: None };

        let b = create_booking(&db, user.id, req(9, 11)).await?;
        assert_eq!(b.status, booking::STATUS_PENDING);
        assert!(matches!(create_booking(&db, user.id, req(10, 12)).await, Err(ServiceError::Conflict(_))));

        update_booking(&db, b.id, req(9, 11)).await?;
        update_status(&db, b.id, "cancelled").await?;
        let other = create_booking(&db, user.id, req(10, 12)).await?;
        assert!(matches!(update_status(&db, b.id, "APPROVED").await, Err(ServiceError::Conflict(_))));

        assert_eq!(by_date_range(&db, at(11), at(11)).await?.iter().filter(|x| x.resource_id == projector.id).count(), 2);

        delete_booking(&db, other.id).await?;
        resource_service::delete_resource(&db, projector.id).await?;
        models::user::Entity::delete_by_id(user.id).exec(&db).await?;
        Ok(())
    }
}
