use std::{fmt, str::FromStr};

use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::{self, ModelError};

/// Campus role carried in tokens and checked by route guards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Faculty,
    Student,
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Faculty => "FACULTY",
            Role::Student => "STUDENT",
            Role::Staff => "STAFF",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Role {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        match upper.strip_prefix("ROLE_").unwrap_or(&upper) {
            "ADMIN" => Ok(Role::Admin),
            "FACULTY" => Ok(Role::Faculty),
            "STUDENT" => Ok(Role::Student),
            "STAFF" => Ok(Role::Staff),
            _ => Err(ModelError::Validation(format!("invalid role: {s}"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    pub full_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: Option<String>,
    pub role: String,
    pub enabled: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn role(&self) -> Option<Role> { self.role.parse().ok() }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_username(username: &str) -> Result<(), ModelError> {
    let u = username.trim();
    if u.len() < 3 || u.len() > 64 {
        return Err(ModelError::Validation("username must be 3..=64 characters".into()));
    }
    if !u.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')) {
        return Err(ModelError::Validation("username may only contain letters, digits, '.', '_' and '-'".into()));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    let e = email.trim();
    match e.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') && e.len() <= 255 => Ok(()),
        _ => Err(ModelError::Validation("invalid email".into())),
    }
}

pub fn validate_full_name(name: &str) -> Result<(), ModelError> {
    errors::require("full_name", name)?;
    if name.len() > 128 { return Err(ModelError::Validation("full_name too long".into())); }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    username: &str,
    full_name: &str,
    email: &str,
    phone: Option<&str>,
    role: Role,
) -> Result<Model, ModelError> {
    validate_username(username)?;
    validate_full_name(full_name)?;
    validate_email(email)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(username.trim().to_string()),
        full_name: Set(full_name.trim().to_string()),
        email: Set(email.trim().to_lowercase()),
        phone: Set(phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty())),
        role: Set(role.as_str().to_string()),
        enabled: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn find_by_username(db: &DatabaseConnection, username: &str) -> Result<Option<Model>, ModelError> {
    Entity::find()
        .filter(Column::Username.eq(username.trim()))
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_with_and_without_prefix() {
        assert_eq!("faculty".parse::<Role>().unwrap(), Role::Faculty);
        assert_eq!("ROLE_ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert!("janitor".parse::<Role>().is_err());
    }

    #[test]
    fn role_serializes_upper_case() {
        assert_eq!(serde_json::to_string(&Role::Staff).unwrap(), "\"STAFF\"");
        assert_eq!(Role::Student.to_string(), "STUDENT");
    }

    #[test]
    fn username_rules() {
        assert!(validate_username("jdoe").is_ok());
        assert!(validate_username("j.doe-2").is_ok());
        assert!(validate_username("jd").is_err());
        assert!(validate_username("john doe").is_err());
    }

    #[test]
    fn email_rules() {
        assert!(validate_email("a@campus.edu").is_ok());
        assert!(validate_email("campus.edu").is_err());
        assert!(validate_email("@campus.edu").is_err());
        assert!(validate_email("a@campus").is_err());
    }
}
