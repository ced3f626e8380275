//! Create `facility_booking` table. Slots are a calendar date plus a start/end time of day.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FacilityBooking::Table)
                    .if_not_exists()
                    .col(uuid(FacilityBooking::Id).primary_key())
                    .col(uuid(FacilityBooking::FacilityId).not_null())
                    .col(uuid(FacilityBooking::TeacherId).not_null())
                    .col(string_len(FacilityBooking::Purpose, 255).not_null())
                    .col(date(FacilityBooking::Date).not_null())
                    .col(time(FacilityBooking::StartTime).not_null())
                    .col(time(FacilityBooking::EndTime).not_null())
                    .col(string_len(FacilityBooking::Status, 16).not_null())
                    .col(text_null(FacilityBooking::Notes))
                    .col(timestamp_with_time_zone(FacilityBooking::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(FacilityBooking::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_facility_booking_facility")
                            .from(FacilityBooking::Table, FacilityBooking::FacilityId)
                            .to(Facility::Table, Facility::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_facility_booking_teacher")
                            .from(FacilityBooking::Table, FacilityBooking::TeacherId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(FacilityBooking::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum FacilityBooking { Table, Id, FacilityId, TeacherId, Purpose, Date, StartTime, EndTime, Status, Notes, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Facility { Table, Id }

#[derive(DeriveIden)]
enum User { Table, Id }
