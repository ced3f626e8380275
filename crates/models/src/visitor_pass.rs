use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors::{self, ModelError}, user};

pub const STATUS_PENDING: &str = "PENDING";
pub const STATUS_APPROVED: &str = "APPROVED";
pub const STATUS_REJECTED: &str = "REJECTED";
pub const STATUS_CHECKED_IN: &str = "CHECKED_IN";
pub const STATUS_CHECKED_OUT: &str = "CHECKED_OUT";
pub const STATUSES: &[&str] = &[STATUS_PENDING, STATUS_APPROVED, STATUS_REJECTED, STATUS_CHECKED_IN, STATUS_CHECKED_OUT];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "visitor_pass")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub visitor_name: String,
    pub visitor_email: Option<String>,
    pub visitor_phone: Option<String>,
    pub purpose: String,
    pub host_id: Uuid,
    pub entry_time: DateTimeWithTimeZone,
    pub exit_time: Option<DateTimeWithTimeZone>,
    pub status: String,
    #[sea_orm(unique)]
    pub qr_code: String,
    pub id_proof_type: Option<String>,
    pub id_proof_number: Option<String>,
    pub vehicle_number: Option<String>,
    pub remarks: Option<String>,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTimeWithTimeZone>,
    pub checked_in_at: Option<DateTimeWithTimeZone>,
    pub checked_out_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Host,
    Approver,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Host => Entity::belongs_to(user::Entity).from(Column::HostId).to(user::Column::Id).into(),
            Relation::Approver => Entity::belongs_to(user::Entity).from(Column::ApprovedBy).to(user::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Gate actions that move a pass through its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassAction {
    Approve,
    Reject,
    CheckIn,
    CheckOut,
}

/// PENDING -> APPROVED | REJECTED, APPROVED -> CHECKED_IN, CHECKED_IN -> CHECKED_OUT.
pub fn next_status(current: &str, action: PassAction) -> Result<&'static str, ModelError> {
    let next = match (current, action) {
        (STATUS_PENDING, PassAction::Approve) => STATUS_APPROVED,
        (STATUS_PENDING, PassAction::Reject) => STATUS_REJECTED,
        (STATUS_APPROVED, PassAction::CheckIn) => STATUS_CHECKED_IN,
        (STATUS_CHECKED_IN, PassAction::CheckOut) => STATUS_CHECKED_OUT,
        _ => {
            return Err(ModelError::Validation(format!("cannot {action:?} a pass in status {current}")));
        }
    };
    Ok(next)
}

pub fn generate_qr_code() -> String { format!("QR-{}", Uuid::new_v4().simple()) }

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NewVisitorPass {
    pub visitor_name: String,
    #[serde(default)]
    pub visitor_email: Option<String>,
    #[serde(default)]
    pub visitor_phone: Option<String>,
    pub purpose: String,
    #[serde(default)]
    pub host_id: Option<Uuid>,
    pub entry_time: DateTimeWithTimeZone,
    #[serde(default)]
    pub exit_time: Option<DateTimeWithTimeZone>,
    #[serde(default)]
    pub id_proof_type: Option<String>,
    #[serde(default)]
    pub id_proof_number: Option<String>,
    #[serde(default)]
    pub vehicle_number: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
}

impl NewVisitorPass {
    pub fn validate(&self) -> Result<(), ModelError> {
        errors::require("visitor_name", &self.visitor_name)?;
        errors::require("purpose", &self.purpose)?;
        if let Some(exit) = self.exit_time {
            if exit <= self.entry_time {
                return Err(ModelError::Validation("exit_time must be after entry_time".into()));
            }
        }
        if let Some(email) = self.visitor_email.as_deref().filter(|e| !e.trim().is_empty()) {
            user::validate_email(email)?;
        }
        Ok(())
    }
}

pub async fn create(db: &DatabaseConnection, host_id: Uuid, input: NewVisitorPass) -> Result<Model, ModelError> {
    input.validate()?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        visitor_name: Set(input.visitor_name.trim().to_string()),
        visitor_email: Set(input.visitor_email),
        visitor_phone: Set(input.visitor_phone),
        purpose: Set(input.purpose.trim().to_string()),
        host_id: Set(host_id),
        entry_time: Set(input.entry_time),
        exit_time: Set(input.exit_time),
        status: Set(STATUS_PENDING.to_string()),
        qr_code: Set(generate_qr_code()),
        id_proof_type: Set(input.id_proof_type),
        id_proof_number: Set(input.id_proof_number),
        vehicle_number: Set(input.vehicle_number),
        remarks: Set(input.remarks),
        approved_by: Set(None),
        approved_at: Set(None),
        checked_in_at: Set(None),
        checked_out_at: Set(None),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_lifecycle() {
        let s = next_status(STATUS_PENDING, PassAction::Approve).unwrap();
        let s = next_status(s, PassAction::CheckIn).unwrap();
        let s = next_status(s, PassAction::CheckOut).unwrap();
        assert_eq!(s, STATUS_CHECKED_OUT);
    }

    #[test]
    fn illegal_transitions_are_rejected() {
        assert!(next_status(STATUS_PENDING, PassAction::CheckIn).is_err());
        assert!(next_status(STATUS_REJECTED, PassAction::Approve).is_err());
        assert!(next_status(STATUS_CHECKED_OUT, PassAction::CheckOut).is_err());
        assert!(next_status(STATUS_APPROVED, PassAction::CheckOut).is_err());
    }

    #[test]
    fn qr_codes_are_unique() {
        assert_ne!(generate_qr_code(), generate_qr_code());
        assert!(generate_qr_code().starts_with("QR-"));
    }
}
