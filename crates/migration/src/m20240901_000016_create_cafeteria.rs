//! Create cafeteria tables: `cafeteria_item`, `cafeteria_order` and `cafeteria_order_item`.
//!
//! Money is stored as integer cents.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CafeteriaItem::Table)
                    .if_not_exists()
                    .col(uuid(CafeteriaItem::Id).primary_key())
                    .col(string_len(CafeteriaItem::Name, 128).not_null())
                    .col(text_null(CafeteriaItem::Description))
                    .col(big_integer(CafeteriaItem::PriceCents).not_null())
                    .col(integer(CafeteriaItem::Quantity).not_null())
                    .col(string_len(CafeteriaItem::Category, 32).not_null())
                    .col(string_len_null(CafeteriaItem::ImageUrl, 512))
                    .col(boolean(CafeteriaItem::Available).default(true))
                    .col(integer_null(CafeteriaItem::PreparationTimeMinutes))
                    .col(text_null(CafeteriaItem::Ingredients))
                    .col(string_len_null(CafeteriaItem::DietaryInfo, 255))
                    .col(timestamp_with_time_zone(CafeteriaItem::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(CafeteriaItem::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CafeteriaOrder::Table)
                    .if_not_exists()
                    .col(uuid(CafeteriaOrder::Id).primary_key())
                    .col(uuid(CafeteriaOrder::UserId).not_null())
                    .col(timestamp_with_time_zone(CafeteriaOrder::OrderTime).not_null())
                    .col(string_len(CafeteriaOrder::Status, 16).not_null())
                    .col(string_len_null(CafeteriaOrder::PaymentMethod, 32))
                    .col(string_len(CafeteriaOrder::PaymentStatus, 16).not_null())
                    .col(string_len_null(CafeteriaOrder::DeliveryLocation, 255))
                    .col(text_null(CafeteriaOrder::Remarks))
                    .col(big_integer(CafeteriaOrder::TotalCents).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cafeteria_order_user")
                            .from(CafeteriaOrder::Table, CafeteriaOrder::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CafeteriaOrderItem::Table)
                    .if_not_exists()
                    .col(uuid(CafeteriaOrderItem::Id).primary_key())
                    .col(uuid(CafeteriaOrderItem::OrderId).not_null())
                    .col(uuid(CafeteriaOrderItem::ItemId).not_null())
                    .col(integer(CafeteriaOrderItem::Quantity).not_null())
                    .col(big_integer(CafeteriaOrderItem::UnitPriceCents).not_null())
                    .col(text_null(CafeteriaOrderItem::SpecialInstructions))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cafeteria_order_item_order")
                            .from(CafeteriaOrderItem::Table, CafeteriaOrderItem::OrderId)
                            .to(CafeteriaOrder::Table, CafeteriaOrder::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cafeteria_order_item_item")
                            .from(CafeteriaOrderItem::Table, CafeteriaOrderItem::ItemId)
                            .to(CafeteriaItem::Table, CafeteriaItem::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(CafeteriaOrderItem::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(CafeteriaOrder::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(CafeteriaItem::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum CafeteriaItem {
    Table,
    Id,
    Name,
    Description,
    PriceCents,
    Quantity,
    Category,
    ImageUrl,
    Available,
    PreparationTimeMinutes,
    Ingredients,
    DietaryInfo,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CafeteriaOrder {
    Table,
    Id,
    UserId,
    OrderTime,
    Status,
    PaymentMethod,
    PaymentStatus,
    DeliveryLocation,
    Remarks,
    TotalCents,
}

#[derive(DeriveIden)]
enum CafeteriaOrderItem { Table, Id, OrderId, ItemId, Quantity, UnitPriceCents, SpecialInstructions }

#[derive(DeriveIden)]
enum User { Table, Id }
