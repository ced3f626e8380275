//! Create `course` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Course::Table)
                    .if_not_exists()
                    .col(uuid(Course::Id).primary_key())
                    .col(string_len(Course::Name, 128).not_null())
                    .col(string_len(Course::CourseCode, 32).unique_key().not_null())
                    .col(text_null(Course::Description))
                    .col(string_len_null(Course::Department, 128))
                    .col(integer(Course::Credits).not_null())
                    .col(string_len_null(Course::Semester, 32))
                    .col(date_null(Course::StartDate))
                    .col(date_null(Course::EndDate))
                    .col(integer_null(Course::Capacity))
                    .col(string_len_null(Course::Location, 128))
                    .col(string_len_null(Course::Schedule, 255))
                    .col(timestamp_with_time_zone(Course::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Course::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Course::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Course {
    Table,
    Id,
    Name,
    CourseCode,
    Description,
    Department,
    Credits,
    Semester,
    StartDate,
    EndDate,
    Capacity,
    Location,
    Schedule,
    CreatedAt,
    UpdatedAt,
}
