use sea_orm::entity::prelude::*;
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::{errors::{self, ModelError}, user};

pub const STATUS_PENDING: &str = "PENDING";
pub const STATUS_CANCELLED: &str = "CANCELLED";
pub const STATUS_COMPLETED: &str = "COMPLETED";
pub const STATUSES: &[&str] = &[STATUS_PENDING, "PREPARING", "READY", STATUS_COMPLETED, STATUS_CANCELLED];
pub const PAYMENT_STATUSES: &[&str] = &["PENDING", "PAID", "REFUNDED"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cafeteria_order")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub order_time: DateTimeWithTimeZone,
    pub status: String,
    pub payment_method: Option<String>,
    pub payment_status: String,
    pub delivery_location: Option<String>,
    pub remarks: Option<String>,
    pub total_cents: i64,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { User }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity).from(Column::UserId).to(user::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Terminal orders cannot change status any more.
pub fn validate_transition(current: &str, next: &str) -> Result<String, ModelError> {
    let next = errors::one_of("status", next, STATUSES)?;
    if current == STATUS_COMPLETED || current == STATUS_CANCELLED {
        return Err(ModelError::Validation(format!("order already {current}")));
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_orders_are_frozen() {
        assert_eq!(validate_transition(STATUS_PENDING, "preparing").unwrap(), "PREPARING");
        assert!(validate_transition(STATUS_COMPLETED, "READY").is_err());
        assert!(validate_transition(STATUS_CANCELLED, "PENDING").is_err());
        assert!(validate_transition(STATUS_PENDING, "LOST").is_err());
    }
}
