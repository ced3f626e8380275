use sea_orm::{entity::prelude::*, Set, ConnectionTrait};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors::{self, ModelError}, user};

pub const TYPES: &[&str] = &["GENERAL", "ACADEMIC", "EVENT", "BOOKING", "CAFETERIA", "VISITOR", "SYSTEM"];
pub const PRIORITIES: &[&str] = &["LOW", "NORMAL", "HIGH", "URGENT"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notification")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub title: String,
    pub message: String,
    pub notification_type: String,
    pub priority: String,
    pub action_url: Option<String>,
    pub read: bool,
    pub read_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Recipient }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Recipient => Entity::belongs_to(user::Entity).from(Column::RecipientId).to(user::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Message body without a recipient; the recipient is supplied per insert.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NewNotification {
    pub title: String,
    pub message: String,
    #[serde(default = "default_type")]
    pub notification_type: String,
    #[serde(default = "default_priority")]
    pub priority: String,
    #[serde(default)]
    pub action_url: Option<String>,
}

fn default_type() -> String { "GENERAL".into() }
fn default_priority() -> String { "NORMAL".into() }

impl NewNotification {
    /// Validate and normalize labels in place.
    pub fn normalized(mut self) -> Result<Self, ModelError> {
        errors::require("title", &self.title)?;
        errors::require("message", &self.message)?;
        self.notification_type = errors::one_of("notification_type", &self.notification_type, TYPES)?;
        self.priority = errors::one_of("priority", &self.priority, PRIORITIES)?;
        Ok(self)
    }
}

pub async fn create<C: ConnectionTrait>(db: &C, recipient_id: Uuid, input: &NewNotification) -> Result<Model, ModelError> {
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        recipient_id: Set(recipient_id),
        title: Set(input.title.trim().to_string()),
        message: Set(input.message.clone()),
        notification_type: Set(input.notification_type.clone()),
        priority: Set(input.priority.clone()),
        action_url: Set(input.action_url.clone()),
        read: Set(false),
        read_at: Set(None),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_normalized() {
        let n = NewNotification {
            title: "Exam".into(),
            message: "Room changed".into(),
            notification_type: "academic".into(),
            priority: "high".into(),
            action_url: None,
        }
        .normalized()
        .unwrap();
        assert_eq!(n.notification_type, "ACADEMIC");
        assert_eq!(n.priority, "HIGH");
    }
}
