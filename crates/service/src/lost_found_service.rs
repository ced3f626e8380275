use uuid::Uuid;
use chrono::Utc;
use sea_orm::{
    sea_query::Condition, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};

use models::errors;
use models::lost_found_item::{self, NewLostFoundItem};
use crate::{errors::ServiceError, pagination::Pagination};

/// Descriptive fields; status moves only through claim/return.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct LostFoundUpdate {
    pub item_name: Option<String>,
    pub description: Option<String>,
    pub location_found: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

pub async fn report(db: &DatabaseConnection, reporter_id: Uuid, input: NewLostFoundItem) -> Result<lost_found_item::Model, ServiceError> {
    Ok(lost_found_item::create(db, reporter_id, input).await?)
}

pub async fn get_item(db: &DatabaseConnection, id: Uuid) -> Result<lost_found_item::Model, ServiceError> {
    lost_found_item::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("lost and found item"))
}

pub async fn list_items(db: &DatabaseConnection, opts: Pagination) -> Result<Vec<lost_found_item::Model>, ServiceError> {
    let (page_idx, per_page) = opts.normalize();
    Ok(lost_found_item::Entity::find()
        .order_by_desc(lost_found_item::Column::CreatedAt)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await?)
}

pub async fn update_item(db: &DatabaseConnection, id: Uuid, update: LostFoundUpdate) -> Result<lost_found_item::Model, ServiceError> {
    let mut am: lost_found_item::ActiveModel = get_item(db, id).await?.into();
    if let Some(name) = update.item_name {
        errors::require("item_name", &name)?;
        am.item_name = Set(name.trim().to_string());
    }
    if let Some(description) = update.description {
        am.description = Set(Some(description));
    }
    if let Some(location) = update.location_found {
        am.location_found = Set(Some(location));
    }
    if let Some(category) = update.category {
        am.category = Set(Some(category));
    }
    if let Some(url) = update.image_url {
        am.image_url = Set(Some(url));
    }
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

/// Claim a LOST or FOUND item for `claimant_id`.
pub async fn claim(
    db: &DatabaseConnection,
    id: Uuid,
    claimant_id: Uuid,
    verification_details: Option<String>,
) -> Result<lost_found_item::Model, ServiceError> {
    let item = get_item(db, id).await?;
    if !item.claimable() {
        return Err(ServiceError::conflict(format!("item already {}", item.status.to_lowercase())));
    }
    let now = Utc::now().into();
    let mut am: lost_found_item::ActiveModel = item.into();
    am.status = Set(lost_found_item::STATUS_CLAIMED.to_string());
    am.claimed_by = Set(Some(claimant_id));
    am.claim_date = Set(Some(now));
    am.verification_details = Set(verification_details);
    am.updated_at = Set(now);
    Ok(am.update(db).await?)
}

/// Close out a CLAIMED item.
pub async fn mark_returned(db: &DatabaseConnection, id: Uuid) -> Result<lost_found_item::Model, ServiceError> {
    let item = get_item(db, id).await?;
    if item.status != lost_found_item::STATUS_CLAIMED {
        return Err(ServiceError::Validation("only claimed items can be marked returned".into()));
    }
    let mut am: lost_found_item::ActiveModel = item.into();
    am.status = Set(lost_found_item::STATUS_RETURNED.to_string());
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn by_status(db: &DatabaseConnection, status: &str) -> Result<Vec<lost_found_item::Model>, ServiceError> {
    let status = errors::one_of("status", status, lost_found_item::STATUSES)?;
    Ok(lost_found_item::Entity::find()
        .filter(lost_found_item::Column::Status.eq(status))
        .order_by_desc(lost_found_item::Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn by_category(db: &DatabaseConnection, category: &str) -> Result<Vec<lost_found_item::Model>, ServiceError> {
    Ok(lost_found_item::Entity::find()
        .filter(lost_found_item::Column::Category.eq(category.trim()))
        .order_by_desc(lost_found_item::Column::CreatedAt)
        .all(db)
        .await?)
}

/// Items a user reported or claimed.
pub async fn by_user(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<lost_found_item::Model>, ServiceError> {
    Ok(lost_found_item::Entity::find()
        .filter(
            Condition::any()
                .add(lost_found_item::Column::FoundBy.eq(user_id))
                .add(lost_found_item::Column::ClaimedBy.eq(user_id)),
        )
        .order_by_desc(lost_found_item::Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn delete_item(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    if lost_found_item::Entity::delete_by_id(id).exec(db).await?.rows_affected == 0 {
        return Err(ServiceError::not_found("lost and found item"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, user_with_role};
    use models::user::{self, Role};

    #[tokio::test]
    async fn claim_lifecycle() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let finder = user_with_role(&db, Role::Staff).await?;
        let owner = user_with_role(&db, Role::Student).await?;
        let item = report(&db, finder.id, NewLostFoundItem {
            item_name: "Blue umbrella".into(),
            description: None,
            location_found: Some("Library".into()),
            date_found: None,
            status: "found".into(),
            category: Some("ACCESSORIES".into()),
            image_url: None,
        })
        .await?;

        assert!(matches!(mark_returned(&db, item.id).await, Err(ServiceError::Validation(_))));
        let claimed = claim(&db, item.id, owner.id, Some("described the handle".into())).await?;
        assert_eq!(claimed.status, lost_found_item::STATUS_CLAIMED);
        assert!(matches!(claim(&db, item.id, finder.id, None).await, Err(ServiceError::Conflict(_))));
        assert_eq!(mark_returned(&db, item.id).await?.status, lost_found_item::STATUS_RETURNED);
        assert!(by_user(&db, owner.id).await?.iter().any(|x| x.id == item.id));

        delete_item(&db, item.id).await?;
        for u in [finder, owner] {
            user::Entity::delete_by_id(u.id).exec(&db).await?;
        }
        Ok(())
    }
}
