use uuid::Uuid;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use tracing::info;

use models::errors;
use models::visitor_pass::{self, NewVisitorPass, PassAction};
use crate::{errors::ServiceError, pagination::Pagination, user_service};

/// Host-editable details of a pass that has not been reviewed yet.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct VisitorPassUpdate {
    pub visitor_name: Option<String>,
    pub visitor_email: Option<String>,
    pub visitor_phone: Option<String>,
    pub purpose: Option<String>,
    pub entry_time: Option<DateTimeWithTimeZone>,
    pub exit_time: Option<DateTimeWithTimeZone>,
    pub id_proof_type: Option<String>,
    pub id_proof_number: Option<String>,
    pub vehicle_number: Option<String>,
    pub remarks: Option<String>,
}

pub async fn create_pass(db: &DatabaseConnection, host_id: Uuid, input: NewVisitorPass) -> Result<visitor_pass::Model, ServiceError> {
    let host_id = input.host_id.unwrap_or(host_id);
    user_service::get_user(db, host_id).await?;
    let pass = visitor_pass::create(db, host_id, input).await?;
    info!(pass_id = %pass.id, host_id = %host_id, "visitor_pass_requested");
    Ok(pass)
}

pub async fn update_pass(db: &DatabaseConnection, id: Uuid, update: VisitorPassUpdate) -> Result<visitor_pass::Model, ServiceError> {
    let pass = get_pass(db, id).await?;
    if pass.status != visitor_pass::STATUS_PENDING {
        return Err(ServiceError::Validation(format!("pass already {}", pass.status.to_lowercase())));
    }
    // Re-run creation rules over the merged record.
    let merged = NewVisitorPass {
        visitor_name: update.visitor_name.unwrap_or(pass.visitor_name.clone()),
        visitor_email: update.visitor_email.or(pass.visitor_email.clone()),
        visitor_phone: update.visitor_phone.or(pass.visitor_phone.clone()),
        purpose: update.purpose.unwrap_or(pass.purpose.clone()),
        host_id: Some(pass.host_id),
        entry_time: update.entry_time.unwrap_or(pass.entry_time),
        exit_time: update.exit_time.or(pass.exit_time),
        id_proof_type: update.id_proof_type.or(pass.id_proof_type.clone()),
        id_proof_number: update.id_proof_number.or(pass.id_proof_number.clone()),
        vehicle_number: update.vehicle_number.or(pass.vehicle_number.clone()),
        remarks: update.remarks.or(pass.remarks.clone()),
    };
    merged.validate()?;

    let mut am: visitor_pass::ActiveModel = pass.into();
    am.visitor_name = Set(merged.visitor_name.trim().to_string());
    am.visitor_email = Set(merged.visitor_email);
    am.visitor_phone = Set(merged.visitor_phone);
    am.purpose = Set(merged.purpose.trim().to_string());
    am.entry_time = Set(merged.entry_time);
    am.exit_time = Set(merged.exit_time);
    am.id_proof_type = Set(merged.id_proof_type);
    am.id_proof_number = Set(merged.id_proof_number);
    am.vehicle_number = Set(merged.vehicle_number);
    am.remarks = Set(merged.remarks);
    Ok(am.update(db).await?)
}

pub async fn get_pass(db: &DatabaseConnection, id: Uuid) -> Result<visitor_pass::Model, ServiceError> {
    visitor_pass::Entity::find_by_id(id).one(db).await?.ok_or_else(|| ServiceError::not_found("visitor pass"))
}

pub async fn get_by_qr_code(db: &DatabaseConnection, qr_code: &str) -> Result<visitor_pass::Model, ServiceError> {
    visitor_pass::Entity::find()
        .filter(visitor_pass::Column::QrCode.eq(qr_code.trim()))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("visitor pass"))
}

pub async fn list_passes(db: &DatabaseConnection, opts: Pagination) -> Result<Vec<visitor_pass::Model>, ServiceError> {
    let (page_idx, per_page) = opts.normalize();
    Ok(visitor_pass::Entity::find()
        .order_by_desc(visitor_pass::Column::EntryTime)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await?)
}

pub async fn by_host(db: &DatabaseConnection, host_id: Uuid) -> Result<Vec<visitor_pass::Model>, ServiceError> {
    Ok(visitor_pass::Entity::find()
        .filter(visitor_pass::Column::HostId.eq(host_id))
        .order_by_desc(visitor_pass::Column::EntryTime)
        .all(db)
        .await?)
}

pub async fn by_status(db: &DatabaseConnection, status: &str) -> Result<Vec<visitor_pass::Model>, ServiceError> {
    let status = errors::one_of("status", status, visitor_pass::STATUSES)?;
    Ok(visitor_pass::Entity::find()
        .filter(visitor_pass::Column::Status.eq(status))
        .order_by_asc(visitor_pass::Column::EntryTime)
        .all(db)
        .await?)
}

/// Passes whose entry time falls in `[from, to]`.
pub async fn by_date_range(
    db: &DatabaseConnection,
    from: DateTimeWithTimeZone,
    to: DateTimeWithTimeZone,
) -> Result<Vec<visitor_pass::Model>, ServiceError> {
    if to < from {
        return Err(ServiceError::Validation("range end must not precede start".into()));
    }
    Ok(visitor_pass::Entity::find()
        .filter(visitor_pass::Column::EntryTime.between(from, to))
        .order_by_asc(visitor_pass::Column::EntryTime)
        .all(db)
        .await?)
}

async fn transition(
    db: &DatabaseConnection,
    id: Uuid,
    action: PassAction,
    actor: Option<Uuid>,
    remarks: Option<String>,
) -> Result<visitor_pass::Model, ServiceError> {
    let pass = get_pass(db, id).await?;
    let next = visitor_pass::next_status(&pass.status, action)?;
    let now: DateTimeWithTimeZone = Utc::now().into();
    let mut am: visitor_pass::ActiveModel = pass.into();
    am.status = Set(next.to_string());
    match action {
        PassAction::Approve | PassAction::Reject => {
            am.approved_by = Set(actor);
            am.approved_at = Set(Some(now));
        }
        PassAction::CheckIn => am.checked_in_at = Set(Some(now)),
        PassAction::CheckOut => {
            am.checked_out_at = Set(Some(now));
            am.exit_time = Set(Some(now));
        }
    }
    if remarks.is_some() {
        am.remarks = Set(remarks);
    }
    let saved = am.update(db).await?;
    info!(pass_id = %saved.id, status = %saved.status, "visitor_pass_transitioned");
    Ok(saved)
}

pub async fn approve(db: &DatabaseConnection, id: Uuid, approver_id: Uuid) -> Result<visitor_pass::Model, ServiceError> {
    transition(db, id, PassAction::Approve, Some(approver_id), None).await
}

/// Reject a pending pass; the reason replaces the remarks.
pub async fn reject(db: &DatabaseConnection, id: Uuid, approver_id: Uuid, reason: &str) -> Result<visitor_pass::Model, ServiceError> {
    errors::require("reason", reason)?;
    transition(db, id, PassAction::Reject, Some(approver_id), Some(reason.trim().to_string())).await
}

pub async fn check_in(db: &DatabaseConnection, id: Uuid) -> Result<visitor_pass::Model, ServiceError> {
    transition(db, id, PassAction::CheckIn, None, None).await
}

pub async fn check_out(db: &DatabaseConnection, id: Uuid) -> Result<visitor_pass::Model, ServiceError> {
    transition(db, id, PassAction::CheckOut, None, None).await
}

pub async fn delete_pass(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    if visitor_pass::Entity::delete_by_id(id).exec(db).await?.rows_affected == 0 {
        return Err(ServiceError::not_found("visitor pass"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, user_with_role};
    use models::user::{self, Role};

    fn new_pass(entry_time: DateTimeWithTimeZone) -> NewVisitorPass {
        NewVisitorPass {
            visitor_name: "Dana Guest".into(),
            visitor_email: Some("dana@example.com".into()),
            visitor_phone: None,
            purpose: "Guest lecture".into(),
            host_id: None,
            entry_time,
            exit_time: None,
            id_proof_type: None,
            id_proof_number: None,
            vehicle_number: None,
            remarks: None,
        }
    }

    #[tokio::test]
    async fn pass_lifecycle_and_lookup() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let host = user_with_role(&db, Role::Faculty).await?;
        let guard = user_with_role(&db, Role::Staff).await?;
        let pass = create_pass(&db, host.id, new_pass(Utc::now().into())).await?;
        assert_eq!(pass.status, visitor_pass::STATUS_PENDING);
        assert_eq!(get_by_qr_code(&db, &pass.qr_code).await?.id, pass.id);

        let edited = update_pass(&db, pass.id, VisitorPassUpdate { purpose: Some("Thesis defense".into()), ..Default::default() }).await?;
        assert_eq!(edited.purpose, "Thesis defense");

        assert!(check_in(&db, pass.id).await.is_err());
        approve(&db, pass.id, guard.id).await?;
        assert!(matches!(
            update_pass(&db, pass.id, VisitorPassUpdate::default()).await,
            Err(ServiceError::Validation(_))
        ));
        check_in(&db, pass.id).await?;
        let done = check_out(&db, pass.id).await?;
        assert_eq!(done.status, visitor_pass::STATUS_CHECKED_OUT);
        assert!(done.exit_time.is_some());

        delete_pass(&db, pass.id).await?;
        for u in [host, guard] {
            user::Entity::delete_by_id(u.id).exec(&db).await?;
        }
        Ok(())
    }

    #[tokio::test]
    async fn reject_records_reason() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let host = user_with_role(&db, Role::Staff).await?;
        let pass = create_pass(&db, host.id, new_pass(Utc::now().into())).await?;
        let rejected = reject(&db, pass.id, host.id, "no ID on file").await?;
        assert_eq!(rejected.status, visitor_pass::STATUS_REJECTED);
        assert_eq!(rejected.remarks.as_deref(), Some("no ID on file"));
        assert!(approve(&db, pass.id, host.id).await.is_err());

        delete_pass(&db, pass.id).await?;
        user::Entity::delete_by_id(host.id).exec(&db).await?;
        Ok(())
    }
}
