//! Create `feedback` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Feedback::Table)
                    .if_not_exists()
                    .col(uuid(Feedback::Id).primary_key())
                    .col(uuid(Feedback::UserId).not_null())
                    .col(string_len(Feedback::Subject, 255).not_null())
                    .col(text(Feedback::Message).not_null())
                    .col(string_len(Feedback::Category, 32).not_null())
                    .col(string_len(Feedback::Status, 16).not_null())
                    .col(string_len(Feedback::Priority, 16).not_null())
                    .col(text_null(Feedback::Response))
                    .col(uuid_null(Feedback::RespondedBy))
                    .col(timestamp_with_time_zone_null(Feedback::ResponseTime))
                    .col(timestamp_with_time_zone(Feedback::SubmissionTime).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feedback_user")
                            .from(Feedback::Table, Feedback::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feedback_responder")
                            .from(Feedback::Table, Feedback::RespondedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Feedback::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Feedback {
    Table,
    Id,
    UserId,
    Subject,
    Message,
    Category,
    Status,
    Priority,
    Response,
    RespondedBy,
    ResponseTime,
    SubmissionTime,
}

#[derive(DeriveIden)]
enum User { Table, Id }
