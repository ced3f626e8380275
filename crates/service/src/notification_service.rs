use uuid::Uuid;
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use models::notification::{self, NewNotification};
use models::user::{self, Role};
use models::errors;
use crate::{errors::ServiceError, user_service};

/// Send one notification to one user.
pub async fn create_notification(db: &DatabaseConnection, recipient_id: Uuid, input: NewNotification) -> Result<notification::Model, ServiceError> {
    let input = input.normalized()?;
    user_service::get_user(db, recipient_id).await?;
    Ok(notification::create(db, recipient_id, &input).await?)
}

pub async fn get_notification(db: &DatabaseConnection, id: Uuid) -> Result<notification::Model, ServiceError> {
    notification::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("notification"))
}

/// All notifications of a user, newest first.
pub async fn by_user(db: &DatabaseConnection, recipient_id: Uuid) -> Result<Vec<notification::Model>, ServiceError> {
    Ok(notification::Entity::find()
        .filter(notification::Column::RecipientId.eq(recipient_id))
        .order_by_desc(notification::Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn unread(db: &DatabaseConnection, recipient_id: Uuid) -> Result<Vec<notification::Model>, ServiceError> {
    Ok(notification::Entity::find()
        .filter(notification::Column::RecipientId.eq(recipient_id))
        .filter(notification::Column::Read.eq(false))
        .order_by_desc(notification::Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn unread_count(db: &DatabaseConnection, recipient_id: Uuid) -> Result<u64, ServiceError> {
    Ok(notification::Entity::find()
        .filter(notification::Column::RecipientId.eq(recipient_id))
        .filter(notification::Column::Read.eq(false))
        .count(db)
        .await?)
}

pub async fn by_type(db: &DatabaseConnection, recipient_id: Uuid, notification_type: &str) -> Result<Vec<notification::Model>, ServiceError> {
    let t = errors::one_of("notification_type", notification_type, notification::TYPES)?;
    Ok(notification::Entity::find()
        .filter(notification::Column::RecipientId.eq(recipient_id))
        .filter(notification::Column::NotificationType.eq(t))
        .order_by_desc(notification::Column::CreatedAt)
        .all(db)
        .await?)
}

/// Mark one notification read; repeated calls keep the first `read_at`.
pub async fn mark_as_read(db: &DatabaseConnection, id: Uuid) -> Result<notification::Model, ServiceError> {
    let n = get_notification(db, id).await?;
    if n.read {
        return Ok(n);
    }
    let mut am: notification::ActiveModel = n.into();
    am.read = Set(true);
    am.read_at = Set(Some(Utc::now().into()));
    Ok(am.update(db).await?)
}

/// Mark every unread notification of a user read; returns how many changed.
pub async fn mark_all_as_read(db: &DatabaseConnection, recipient_id: Uuid) -> Result<u64, ServiceError> {
    let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();
    let res = notification::Entity::update_many()
        .col_expr(notification::Column::Read, Expr::value(true))
        .col_expr(notification::Column::ReadAt, Expr::value(now))
        .filter(notification::Column::RecipientId.eq(recipient_id))
        .filter(notification::Column::Read.eq(false))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

/// Fan a message out to every enabled user holding `role`; returns the number sent.
pub async fn broadcast_to_role(db: &DatabaseConnection, role: Role, input: NewNotification) -> Result<u64, ServiceError> {
    let input = input.normalized()?;
    let recipients = user::Entity::find()
        .filter(user::Column::Role.eq(role.as_str()))
        .filter(user::Column::Enabled.eq(true))
        .all(db)
        .await?;
    let txn = db.begin().await?;
    for r in &recipients {
        notification::create(&txn, r.id, &input).await?;
    }
    txn.commit().await?;
    info!(role = %role, sent = recipients.len(), "notification_broadcast");
    Ok(recipients.len() as u64)
}

pub async fn delete_notification(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    if notification::Entity::delete_by_id(id).exec(db).await?.rows_affected == 0 {
        return Err(ServiceError::not_found("notification"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, user_with_role};

    fn msg() -> NewNotification {
        NewNotification {
            title: "Exam moved".into(),
            message: "The exam is now on Friday".into(),
            notification_type: "academic".into(),
            priority: "high".into(),
            action_url: None,
        }
    }

    #[tokio::test]
    async fn read_tracking() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let u = user_with_role(&db, Role::Staff).await?;
        let first = create_notification(&db, u.id, msg()).await?;
        create_notification(&db, u.id, msg()).await?;
        assert_eq!(first.notification_type, "ACADEMIC");
        assert_eq!(unread_count(&db, u.id).await?, 2);

        let read = mark_as_read(&db, first.id).await?;
        assert!(read.read && read.read_at.is_some());
        assert_eq!(mark_all_as_read(&db, u.id).await?, 1);
        assert_eq!(unread_count(&db, u.id).await?, 0);
        assert_eq!(by_type(&db, u.id, "ACADEMIC").await?.len(), 2);

        let sent = broadcast_to_role(&db, Role::Staff, msg()).await?;
        assert!(sent >= 1);
        assert_eq!(unread(&db, u.id).await?.len(), 1);

        user::Entity::delete_by_id(u.id).exec(&db).await?;
        Ok(())
    }
}
