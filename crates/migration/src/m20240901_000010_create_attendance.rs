//! Create `attendance` table. One row per student, course and calendar day.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Attendance::Table)
                    .if_not_exists()
                    .col(uuid(Attendance::Id).primary_key())
                    .col(uuid(Attendance::StudentId).not_null())
                    .col(uuid(Attendance::CourseId).not_null())
                    .col(date(Attendance::Date).not_null())
                    .col(string_len(Attendance::Status, 16).not_null())
                    .col(text_null(Attendance::Remarks))
                    .col(uuid_null(Attendance::RecordedBy))
                    .col(timestamp_with_time_zone(Attendance::RecordedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attendance_student")
                            .from(Attendance::Table, Attendance::StudentId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attendance_course")
                            .from(Attendance::Table, Attendance::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attendance_recorder")
                            .from(Attendance::Table, Attendance::RecordedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Attendance::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Attendance { Table, Id, StudentId, CourseId, Date, Status, Remarks, RecordedBy, RecordedAt }

#[derive(DeriveIden)]
enum User { Table, Id }

#[derive(DeriveIden)]
enum Course { Table, Id }
