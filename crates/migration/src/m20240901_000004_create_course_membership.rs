//! Create the course join tables: `course_enrollment` (students) and `course_teacher`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CourseEnrollment::Table)
                    .if_not_exists()
                    .col(uuid(CourseEnrollment::Id).primary_key())
                    .col(uuid(CourseEnrollment::CourseId).not_null())
                    .col(uuid(CourseEnrollment::StudentId).not_null())
                    .col(timestamp_with_time_zone(CourseEnrollment::EnrolledAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_enrollment_course")
                            .from(CourseEnrollment::Table, CourseEnrollment::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_enrollment_student")
                            .from(CourseEnrollment::Table, CourseEnrollment::StudentId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CourseTeacher::Table)
                    .if_not_exists()
                    .col(uuid(CourseTeacher::Id).primary_key())
                    .col(uuid(CourseTeacher::CourseId).not_null())
                    .col(uuid(CourseTeacher::TeacherId).not_null())
                    .col(timestamp_with_time_zone(CourseTeacher::AssignedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_teacher_course")
                            .from(CourseTeacher::Table, CourseTeacher::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_teacher_teacher")
                            .from(CourseTeacher::Table, CourseTeacher::TeacherId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(CourseTeacher::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(CourseEnrollment::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum CourseEnrollment { Table, Id, CourseId, StudentId, EnrolledAt }

#[derive(DeriveIden)]
enum CourseTeacher { Table, Id, CourseId, TeacherId, AssignedAt }

#[derive(DeriveIden)]
enum Course { Table, Id }

#[derive(DeriveIden)]
enum User { Table, Id }
