//! Create `event` and `event_participant` tables.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Event::Table)
                    .if_not_exists()
                    .col(uuid(Event::Id).primary_key())
                    .col(string_len(Event::Title, 255).not_null())
                    .col(text_null(Event::Description))
                    .col(timestamp_with_time_zone(Event::StartTime).not_null())
                    .col(timestamp_with_time_zone(Event::EndTime).not_null())
                    .col(string_len_null(Event::Location, 255))
                    .col(uuid(Event::OrganizerId).not_null())
                    .col(string_len(Event::Status, 16).not_null())
                    .col(string_len_null(Event::ImageUrl, 512))
                    .col(integer_null(Event::MaxParticipants))
                    .col(timestamp_with_time_zone_null(Event::RegistrationDeadline))
                    .col(string_len_null(Event::EventType, 32))
                    .col(timestamp_with_time_zone(Event::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Event::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_organizer")
                            .from(Event::Table, Event::OrganizerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EventParticipant::Table)
                    .if_not_exists()
                    .col(uuid(EventParticipant::Id).primary_key())
                    .col(uuid(EventParticipant::EventId).not_null())
                    .col(uuid(EventParticipant::UserId).not_null())
                    .col(timestamp_with_time_zone(EventParticipant::RegisteredAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_participant_event")
                            .from(EventParticipant::Table, EventParticipant::EventId)
                            .to(Event::Table, Event::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_participant_user")
                            .from(EventParticipant::Table, EventParticipant::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(EventParticipant::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Event::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Event {
    Table,
    Id,
    Title,
    Description,
    StartTime,
    EndTime,
    Location,
    OrganizerId,
    Status,
    ImageUrl,
    MaxParticipants,
    RegistrationDeadline,
    EventType,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum EventParticipant { Table, Id, EventId, UserId, RegisteredAt }

#[derive(DeriveIden)]
enum User { Table, Id }
