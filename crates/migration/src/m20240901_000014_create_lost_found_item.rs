//! Create `lost_found_item` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LostFoundItem::Table)
                    .if_not_exists()
                    .col(uuid(LostFoundItem::Id).primary_key())
                    .col(string_len(LostFoundItem::ItemName, 255).not_null())
                    .col(text_null(LostFoundItem::Description))
                    .col(string_len_null(LostFoundItem::LocationFound, 255))
                    .col(timestamp_with_time_zone_null(LostFoundItem::DateFound))
                    .col(uuid_null(LostFoundItem::FoundBy))
                    .col(uuid_null(LostFoundItem::ClaimedBy))
                    .col(string_len(LostFoundItem::Status, 16).not_null())
                    .col(string_len_null(LostFoundItem::Category, 64))
                    .col(string_len_null(LostFoundItem::ImageUrl, 512))
                    .col(timestamp_with_time_zone_null(LostFoundItem::ClaimDate))
                    .col(text_null(LostFoundItem::VerificationDetails))
                    .col(timestamp_with_time_zone(LostFoundItem::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(LostFoundItem::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lost_found_item_finder")
                            .from(LostFoundItem::Table, LostFoundItem::FoundBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lost_found_item_claimer")
                            .from(LostFoundItem::Table, LostFoundItem::ClaimedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(LostFoundItem::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum LostFoundItem {
    Table,
    Id,
    ItemName,
    Description,
    LocationFound,
    DateFound,
    FoundBy,
    ClaimedBy,
    Status,
    Category,
    ImageUrl,
    ClaimDate,
    VerificationDetails,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum User { Table, Id }
