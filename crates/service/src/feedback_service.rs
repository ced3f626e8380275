use uuid::Uuid;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use models::errors;
use models::feedback::{self, NewFeedback};
use crate::{errors::ServiceError, pagination::Pagination};

/// Submitter-editable fields; absent fields are kept.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct FeedbackUpdate {
    pub subject: Option<String>,
    pub message: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
}

pub async fn create_feedback(db: &DatabaseConnection, user_id: Uuid, input: NewFeedback) -> Result<feedback::Model, ServiceError> {
    Ok(feedback::create(db, user_id, input).await?)
}

pub async fn update_feedback(db: &DatabaseConnection, id: Uuid, update: FeedbackUpdate) -> Result<feedback::Model, ServiceError> {
    let current = get_feedback(db, id).await?;
    let mut am: feedback::ActiveModel = current.into();
    if let Some(subject) = update.subject {
        errors::require("subject", &subject)?;
        am.subject = Set(subject.trim().to_string());
    }
    if let Some(message) = update.message {
        errors::require("message", &message)?;
        am.message = Set(message);
    }
    if let Some(category) = update.category {
        am.category = Set(errors::one_of("category", &category, feedback::CATEGORIES)?);
    }
    if let Some(priority) = update.priority {
        am.priority = Set(errors::one_of("priority", &priority, feedback::PRIORITIES)?);
    }
    Ok(am.update(db).await?)
}

/// Store a staff response and mark the feedback RESOLVED.
pub async fn respond(db: &DatabaseConnection, id: Uuid, responder_id: Uuid, response: &str) -> Result<feedback::Model, ServiceError> {
    errors::require("response", response)?;
    let mut am: feedback::ActiveModel = get_feedback(db, id).await?.into();
    am.response = Set(Some(response.trim().to_string()));
    am.responded_by = Set(Some(responder_id));
    am.response_time = Set(Some(Utc::now().into()));
    am.status = Set(feedback::STATUS_RESOLVED.to_string());
    Ok(am.update(db).await?)
}

pub async fn update_status(db: &DatabaseConnection, id: Uuid, status: &str) -> Result<feedback::Model, ServiceError> {
    let status = errors::one_of("status", status, feedback::STATUSES)?;
    let mut am: feedback::ActiveModel = get_feedback(db, id).await?.into();
    am.status = Set(status);
    Ok(am.update(db).await?)
}

pub async fn get_feedback(db: &DatabaseConnection, id: Uuid) -> Result<feedback::Model, ServiceError> {
    feedback::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("feedback"))
}

/// Newest first, paginated.
pub async fn list_feedback(db: &DatabaseConnection, opts: Pagination) -> Result<Vec<feedback::Model>, ServiceError> {
    let (page_idx, per_page) = opts.normalize();
    Ok(feedback::Entity::find()
        .order_by_desc(feedback::Column::SubmissionTime)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await?)
}

pub async fn by_user(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<feedback::Model>, ServiceError> {
    Ok(feedback::Entity::find()
        .filter(feedback::Column::UserId.eq(user_id))
        .order_by_desc(feedback::Column::SubmissionTime)
        .all(db)
        .await?)
}

pub async fn by_status(db: &DatabaseConnection, status: &str) -> Result<Vec<feedback::Model>, ServiceError> {
    let status = errors::one_of("status", status, feedback::STATUSES)?;
    Ok(feedback::Entity::find()
        .filter(feedback::Column::Status.eq(status))
        .order_by_desc(feedback::Column::SubmissionTime)
        .all(db)
        .await?)
}

pub async fn by_category(db: &DatabaseConnection, category: &str) -> Result<Vec<feedback::Model>, ServiceError> {
    let category = errors::one_of("category", category, feedback::CATEGORIES)?;
    Ok(feedback::Entity::find()
        .filter(feedback::Column::Category.eq(category))
        .order_by_desc(feedback::Column::SubmissionTime)
        .all(db)
        .await?)
}

pub async fn delete_feedback(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    if feedback::Entity::delete_by_id(id).exec(db).await?.rows_affected == 0 {
        return Err(ServiceError::not_found("feedback"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, user_with_role};
    use models::user::{self, Role};

    #[tokio::test]
    async fn respond_resolves() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let student = user_with_role(&db, Role::Student).await?;
        let admin = user_with_role(&db, Role::Admin).await?;
        let f = create_feedback(&db, student.id, NewFeedback {
            subject: "Wifi".into(),
            message: "Library wifi drops".into(),
            category: "facility".into(),
            priority: "high".into(),
        })
        .await?;
        assert_eq!(f.status, feedback::STATUS_PENDING);

        let r = respond(&db, f.id, admin.id, "Access points replaced").await?;
        assert_eq!(r.status, feedback::STATUS_RESOLVED);
        assert_eq!(r.responded_by, Some(admin.id));
        assert!(r.response_time.is_some());
        assert!(by_status(&db, "resolved").await?.iter().any(|x| x.id == f.id));

        for u in [student, admin] {
            user::Entity::delete_by_id(u.id).exec(&db).await?;
        }
        Ok(())
    }
}
