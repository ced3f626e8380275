//! Create `resource` table (rooms, equipment, vehicles bookable by time range).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Resource::Table)
                    .if_not_exists()
                    .col(uuid(Resource::Id).primary_key())
                    .col(string_len(Resource::Name, 128).not_null())
                    .col(text_null(Resource::Description))
                    .col(string_len(Resource::ResourceType, 32).not_null())
                    .col(string_len_null(Resource::Location, 255))
                    .col(integer_null(Resource::Capacity))
                    .col(boolean(Resource::Available).default(true))
                    .col(time_null(Resource::OpeningTime))
                    .col(time_null(Resource::ClosingTime))
                    .col(string_len_null(Resource::ImageUrl, 512))
                    .col(text_null(Resource::Specifications))
                    .col(string_len(Resource::Status, 32).not_null())
                    .col(text_null(Resource::BookingRules))
                    .col(text_null(Resource::Restrictions))
                    .col(timestamp_with_time_zone(Resource::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Resource::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Resource::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Resource {
    Table,
    Id,
    Name,
    Description,
    ResourceType,
    Location,
    Capacity,
    Available,
    OpeningTime,
    ClosingTime,
    ImageUrl,
    Specifications,
    Status,
    BookingRules,
    Restrictions,
    CreatedAt,
    UpdatedAt,
}
