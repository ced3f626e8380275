//! Create `course_resource` table (course material metadata; files live elsewhere).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CourseResource::Table)
                    .if_not_exists()
                    .col(uuid(CourseResource::Id).primary_key())
                    .col(uuid(CourseResource::CourseId).not_null())
                    .col(string_len(CourseResource::Title, 255).not_null())
                    .col(text_null(CourseResource::Description))
                    .col(string_len(CourseResource::FilePath, 512).not_null())
                    .col(string_len(CourseResource::ResourceType, 32).not_null())
                    .col(uuid_null(CourseResource::UploadedBy))
                    .col(timestamp_with_time_zone(CourseResource::UploadDate).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_resource_course")
                            .from(CourseResource::Table, CourseResource::CourseId)
                            .to(Course::Table, Course::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_resource_uploader")
                            .from(CourseResource::Table, CourseResource::UploadedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(CourseResource::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum CourseResource { Table, Id, CourseId, Title, Description, FilePath, ResourceType, UploadedBy, UploadDate }

#[derive(DeriveIden)]
enum Course { Table, Id }

#[derive(DeriveIden)]
enum User { Table, Id }
