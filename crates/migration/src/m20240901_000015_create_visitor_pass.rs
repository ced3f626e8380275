//! Create `visitor_pass` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VisitorPass::Table)
                    .if_not_exists()
                    .col(uuid(VisitorPass::Id).primary_key())
                    .col(string_len(VisitorPass::VisitorName, 128).not_null())
                    .col(string_len_null(VisitorPass::VisitorEmail, 255))
                    .col(string_len_null(VisitorPass::VisitorPhone, 32))
                    .col(string_len(VisitorPass::Purpose, 255).not_null())
                    .col(uuid(VisitorPass::HostId).not_null())
                    .col(timestamp_with_time_zone(VisitorPass::EntryTime).not_null())
                    .col(timestamp_with_time_zone_null(VisitorPass::ExitTime))
                    .col(string_len(VisitorPass::Status, 16).not_null())
                    .col(string_len(VisitorPass::QrCode, 64).unique_key().not_null())
                    .col(string_len_null(VisitorPass::IdProofType, 32))
                    .col(string_len_null(VisitorPass::IdProofNumber, 64))
                    .col(string_len_null(VisitorPass::VehicleNumber, 32))
                    .col(text_null(VisitorPass::Remarks))
                    .col(uuid_null(VisitorPass::ApprovedBy))
                    .col(timestamp_with_time_zone_null(VisitorPass::ApprovedAt))
                    .col(timestamp_with_time_zone_null(VisitorPass::CheckedInAt))
                    .col(timestamp_with_time_zone_null(VisitorPass::CheckedOutAt))
                    .col(timestamp_with_time_zone(VisitorPass::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_visitor_pass_host")
                            .from(VisitorPass::Table, VisitorPass::HostId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_visitor_pass_approver")
                            .from(VisitorPass::Table, VisitorPass::ApprovedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(VisitorPass::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum VisitorPass {
    Table,
    Id,
    VisitorName,
    VisitorEmail,
    VisitorPhone,
    Purpose,
    HostId,
    EntryTime,
    ExitTime,
    Status,
    QrCode,
    IdProofType,
    IdProofNumber,
    VehicleNumber,
    Remarks,
    ApprovedBy,
    ApprovedAt,
    CheckedInAt,
    CheckedOutAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum User { Table, Id }
