use uuid::Uuid;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use models::user::{self, Role};
use models::user_credentials;
use crate::auth::{hash_password, service::PASSWORD_ALGORITHM};
use crate::{errors::ServiceError, pagination::Pagination};

/// Account created by an administrator; any role may be assigned.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NewUser {
    pub username: String,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: Role,
    pub password: String,
}

/// Partial update; absent fields are left unchanged.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct UserUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<Role>,
    pub enabled: Option<bool>,
    pub password: Option<String>,
}

async fn ensure_unique(db: &DatabaseConnection, username: Option<&str>, email: Option<&str>) -> Result<(), ServiceError> {
    if let Some(name) = username {
        if user::find_by_username(db, name).await?.is_some() {
            return Err(ServiceError::conflict(format!("username already taken: {}", name.trim())));
        }
    }
    if let Some(mail) = email {
        let taken = user::Entity::find()
            .filter(user::Column::Email.eq(mail.trim().to_lowercase()))
            .one(db)
            .await?;
        if taken.is_some() {
            return Err(ServiceError::conflict(format!("email already registered: {}", mail.trim())));
        }
    }
    Ok(())
}

/// Create a user with credentials.
pub async fn create_user(db: &DatabaseConnection, input: NewUser) -> Result<user::Model, ServiceError> {
    let hash = hash_password(&input.password)?;
    ensure_unique(db, Some(&input.username), Some(&input.email)).await?;
    let created = user::create(db, &input.username, &input.full_name, &input.email, input.phone.as_deref(), input.role).await?;
    user_credentials::upsert_password(db, created.id, hash, PASSWORD_ALGORITHM).await?;
    Ok(created)
}

/// Get a user by id.
pub async fn get_user(db: &DatabaseConnection, id: Uuid) -> Result<user::Model, ServiceError> {
    user::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("user"))
}

pub async fn get_by_username(db: &DatabaseConnection, username: &str) -> Result<user::Model, ServiceError> {
    user::find_by_username(db, username).await?.ok_or_else(|| ServiceError::not_found("user"))
}

/// List users with pagination, ordered by username.
pub async fn list_users(db: &DatabaseConnection, opts: Pagination) -> Result<Vec<user::Model>, ServiceError> {
    let (page_idx, per_page) = opts.normalize();
    let users = user::Entity::find()
        .order_by_asc(user::Column::Username)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await?;
    Ok(users)
}

pub async fn list_by_role(db: &DatabaseConnection, role: Role) -> Result<Vec<user::Model>, ServiceError> {
    Ok(user::Entity::find()
        .filter(user::Column::Role.eq(role.as_str()))
        .order_by_asc(user::Column::Username)
        .all(db)
        .await?)
}

/// Apply a partial update; a new password replaces the stored hash.
pub async fn update_user(db: &DatabaseConnection, id: Uuid, update: UserUpdate) -> Result<user::Model, ServiceError> {
    let current = get_user(db, id).await?;
    if let Some(email) = update.email.as_deref() {
        user::validate_email(email)?;
        if !email.trim().eq_ignore_ascii_case(&current.email) {
            ensure_unique(db, None, Some(email)).await?;
        }
    }
    if let Some(name) = update.full_name.as_deref() {
        user::validate_full_name(name)?;
    }
    let new_hash = update.password.as_deref().map(hash_password).transpose()?;

    let mut am: user::ActiveModel = current.into();
    if let Some(name) = update.full_name {
        am.full_name = Set(name.trim().to_string());
    }
    if let Some(email) = update.email {
        am.email = Set(email.trim().to_lowercase());
    }
    if let Some(phone) = update.phone {
        am.phone = Set(Some(phone.trim().to_string()).filter(|p| !p.is_empty()));
    }
    if let Some(role) = update.role {
        am.role = Set(role.as_str().to_string());
    }
    if let Some(enabled) = update.enabled {
        am.enabled = Set(enabled);
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await?;
    if let Some(hash) = new_hash {
        user_credentials::upsert_password(db, id, hash, PASSWORD_ALGORITHM).await?;
    }
    Ok(updated)
}

/// Hard-delete a user; dependent rows cascade.
pub async fn delete_user(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let res = user::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("user"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    fn new_user(tag: &str, role: Role) -> NewUser {
        NewUser {
            username: format!("svc_{tag}"),
            full_name: "Svc User".into(),
            email: format!("svc_{tag}@campus.edu"),
            phone: None,
            role,
            password: "Password123".into(),
        }
    }

    #[tokio::test]
    async fn user_crud_service() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let tag = Uuid::new_v4().simple().to_string()[..10].to_string();

        let u = create_user(&db, new_user(&tag, Role::Faculty)).await?;
        assert_eq!(u.role(), Some(Role::Faculty));
        assert!(user_credentials::find_by_user(&db, u.id).await?.is_some());

        let dup = create_user(&db, new_user(&tag, Role::Student)).await;
        assert!(matches!(dup, Err(ServiceError::Conflict(_))));

        let found = get_by_username(&db, &u.username).await?;
        assert_eq!(found.id, u.id);

        let updated = update_user(&db, u.id, UserUpdate { full_name: Some("New Name".into()), enabled: Some(false), ..Default::default() }).await?;
        assert_eq!(updated.full_name, "New Name");
        assert!(!updated.enabled);

        assert!(list_by_role(&db, Role::Faculty).await?.iter().any(|x| x.id == u.id));
        let page = list_users(&db, Pagination { page: 1, per_page: 2 }).await?;
        assert!(page.len() <= 2);

        delete_user(&db, u.id).await?;
        assert!(matches!(get_user(&db, u.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }
}
