use uuid::Uuid;
use chrono::Utc;
use sea_orm::{
    prelude::DateTimeWithTimeZone, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::info;

use models::event::{self, NewEvent};
use models::{event_participant, user};
use crate::errors::ServiceError;

pub async fn create_event(db: &DatabaseConnection, organizer_id: Uuid, input: NewEvent) -> Result<event::Model, ServiceError> {
    Ok(event::create(db, organizer_id, input).await?)
}

/// Replace schedule and details; status and organizer are kept.
pub async fn update_event(db: &DatabaseConnection, id: Uuid, input: NewEvent) -> Result<event::Model, ServiceError> {
    input.validate()?;
    let mut am: event::ActiveModel = get_event(db, id).await?.into();
    am.title = Set(input.title.trim().to_string());
    am.description = Set(input.description);
    am.start_time = Set(input.start_time);
    am.end_time = Set(input.end_time);
    am.location = Set(input.location);
    am.image_url = Set(input.image_url);
    am.max_participants = Set(input.max_participants);
    am.registration_deadline = Set(input.registration_deadline);
    am.event_type = Set(input.event_type);
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn get_event(db: &DatabaseConnection, id: Uuid) -> Result<event::Model, ServiceError> {
    event::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("event"))
}

pub async fn list_events(db: &DatabaseConnection) -> Result<Vec<event::Model>, ServiceError> {
    Ok(event::Entity::find().order_by_asc(event::Column::StartTime).all(db).await?)
}

/// Events still ahead with status UPCOMING, soonest first.
pub async fn upcoming(db: &DatabaseConnection) -> Result<Vec<event::Model>, ServiceError> {
    let now: DateTimeWithTimeZone = Utc::now().into();
    Ok(event::Entity::find()
        .filter(event::Column::Status.eq(event::STATUS_UPCOMING))
        .filter(event::Column::StartTime.gt(now))
        .order_by_asc(event::Column::StartTime)
        .all(db)
        .await?)
}

pub async fn by_organizer(db: &DatabaseConnection, organizer_id: Uuid) -> Result<Vec<event::Model>, ServiceError> {
    Ok(event::Entity::find()
        .filter(event::Column::OrganizerId.eq(organizer_id))
        .order_by_asc(event::Column::StartTime)
        .all(db)
        .await?)
}

/// Events starting within `[from, to]`.
pub async fn by_date_range(
    db: &DatabaseConnection,
    from: DateTimeWithTimeZone,
    to: DateTimeWithTimeZone,
) -> Result<Vec<event::Model>, ServiceError> {
    if from > to {
        return Err(ServiceError::Validation("start must not be after end".into()));
    }
    Ok(event::Entity::find()
        .filter(event::Column::StartTime.between(from, to))
        .order_by_asc(event::Column::StartTime)
        .all(db)
        .await?)
}

/// Register `user_id`; closed registration is invalid, duplicates and full events conflict.
pub async fn register(db: &DatabaseConnection, event_id: Uuid, user_id: Uuid) -> Result<event_participant::Model, ServiceError> {
    let ev = get_event(db, event_id).await?;
    if !ev.registration_open(Utc::now().into()) {
        return Err(ServiceError::Validation("registration for this event is closed".into()));
    }
    let participants = event_participant::Entity::find().filter(event_participant::Column::EventId.eq(event_id));
    let already = participants
        .clone()
        .filter(event_participant::Column::UserId.eq(user_id))
        .one(db)
        .await?;
    if already.is_some() {
        return Err(ServiceError::conflict("already registered for this event"));
    }
    if ev.is_full(participants.count(db).await?) {
        return Err(ServiceError::conflict("event is full"));
    }
    let p = event_participant::create(db, event_id, user_id).await?;
    info!(event_id = %event_id, user_id = %user_id, "event_registration");
    Ok(p)
}

pub async fn unregister(db: &DatabaseConnection, event_id: Uuid, user_id: Uuid) -> Result<(), ServiceError> {
    let res = event_participant::Entity::delete_many()
        .filter(event_participant::Column::EventId.eq(event_id))
        .filter(event_participant::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("event registration"));
    }
    Ok(())
}

pub async fn participants(db: &DatabaseConnection, event_id: Uuid) -> Result<Vec<user::Model>, ServiceError> {
    let ids: Vec<Uuid> = event_participant::Entity::find()
        .filter(event_participant::Column::EventId.eq(event_id))
        .all(db)
        .await?
        .into_iter()
        .map(|p| p.user_id)
        .collect();
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(user::Entity::find().filter(user::Column::Id.is_in(ids)).all(db).await?)
}

pub async fn delete_event(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    if event::Entity::delete_by_id(id).exec(db).await?.rows_affected == 0 {
        return Err(ServiceError::not_found("event"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, user_with_role};
    use chrono::Duration;
    use models::user::Role;

    #[tokio::test]
    async fn registration_respects_capacity_and_duplicates() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let organizer = user_with_role(&db, Role::Faculty).await?;
        let a = user_with_role(&db, Role::Student).await?;
        let b = user_with_role(&db, Role::Student).await?;
        let start = Utc::now() + Duration::days(7);
        let ev = create_event(&db, organizer.id, NewEvent {
            title: "Hackathon".into(),
            description: None,
            start_time: start.into(),
            end_time: (start + Duration::hours(8)).into(),
            location: None,
            image_url: None,
            max_participants: Some(1),
            registration_deadline: None,
            event_type: None,
        })
        .await?;
        assert_eq!(ev.status, event::STATUS_UPCOMING);

        register(&db, ev.id, a.id).await?;
        assert!(matches!(register(&db, ev.id, a.id).await, Err(ServiceError::Conflict(_))));
        assert!(matches!(register(&db, ev.id, b.id).await, Err(ServiceError::Conflict(_))));
        assert_eq!(participants(&db, ev.id).await?.len(), 1);
        unregister(&db, ev.id, a.id).await?;
        register(&db, ev.id, b.id).await?;
        assert!(upcoming(&db).await?.iter().any(|e| e.id == ev.id));

        delete_event(&db, ev.id).await?;
        for u in [organizer, a, b] {
            user::Entity::delete_by_id(u.id).exec(&db).await?;
        }
        Ok(())
    }
}
