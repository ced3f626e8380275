use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const INDEXES: &[&str] = &[
    "uniq_course_enrollment_course_student",
    "uniq_course_teacher_course_teacher",
    "uniq_event_participant_event_user",
    "idx_facility_booking_facility_date",
    "idx_booking_resource_start",
    "idx_attendance_student_course_date",
    "idx_notification_recipient_read",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Join tables: a pair may appear only once
        manager
            .create_index(
                Index::create()
                    .name("uniq_course_enrollment_course_student")
                    .table(CourseEnrollment::Table)
                    .col(CourseEnrollment::CourseId)
                    .col(CourseEnrollment::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("uniq_course_teacher_course_teacher")
                    .table(CourseTeacher::Table)
                    .col(CourseTeacher::CourseId)
                    .col(CourseTeacher::TeacherId)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("uniq_event_participant_event_user")
                    .table(EventParticipant::Table)
                    .col(EventParticipant::EventId)
                    .col(EventParticipant::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Conflict lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_facility_booking_facility_date")
                    .table(FacilityBooking::Table)
                    .col(FacilityBooking::FacilityId)
                    .col(FacilityBooking::Date)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_booking_resource_start")
                    .table(Booking::Table)
                    .col(Booking::ResourceId)
                    .col(Booking::StartTime)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attendance_student_course_date")
                    .table(Attendance::Table)
                    .col(Attendance::StudentId)
                    .col(Attendance::CourseId)
                    .col(Attendance::Date)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_notification_recipient_read")
                    .table(Notification::Table)
                    .col(Notification::RecipientId)
                    .col(Notification::Read)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in INDEXES {
            manager
                .drop_index(Index::drop().name(*name).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum CourseEnrollment { Table, CourseId, StudentId }

#[derive(DeriveIden)]
enum CourseTeacher { Table, CourseId, TeacherId }

#[derive(DeriveIden)]
enum EventParticipant { Table, EventId, UserId }

#[derive(DeriveIden)]
enum FacilityBooking { Table, FacilityId, Date }

#[derive(DeriveIden)]
enum Booking { Table, ResourceId, StartTime }

#[derive(DeriveIden)]
enum Attendance { Table, StudentId, CourseId, Date }

#[derive(DeriveIden)]
enum Notification { Table, RecipientId, Read }
