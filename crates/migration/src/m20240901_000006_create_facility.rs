//! Create `facility` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Facility::Table)
                    .if_not_exists()
                    .col(uuid(Facility::Id).primary_key())
                    .col(string_len(Facility::Name, 128).not_null())
                    .col(text_null(Facility::Description))
                    .col(string_len(Facility::Location, 255).not_null())
                    .col(string_len(Facility::FacilityType, 32).not_null())
                    .col(integer_null(Facility::Capacity))
                    .col(boolean(Facility::Available).default(true))
                    .col(time_null(Facility::OpeningTime))
                    .col(time_null(Facility::ClosingTime))
                    .col(string_len_null(Facility::ImageUrl, 512))
                    .col(text_null(Facility::Amenities))
                    .col(string_len(Facility::Status, 32).not_null())
                    .col(timestamp_with_time_zone(Facility::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Facility::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Facility::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Facility {
    Table,
    Id,
    Name,
    Description,
    Location,
    FacilityType,
    Capacity,
    Available,
    OpeningTime,
    ClosingTime,
    ImageUrl,
    Amenities,
    Status,
    CreatedAt,
    UpdatedAt,
}
