//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240901_000001_create_user;
mod m20240901_000002_create_user_credentials;
mod m20240901_000003_create_course;
mod m20240901_000004_create_course_membership;
mod m20240901_000005_create_course_resource;
mod m20240901_000006_create_facility;
mod m20240901_000007_create_facility_booking;
mod m20240901_000008_create_resource;
mod m20240901_000009_create_booking;
mod m20240901_000010_create_attendance;
mod m20240901_000011_create_event;
mod m20240901_000012_create_notification;
mod m20240901_000013_create_feedback;
mod m20240901_000014_create_lost_found_item;
mod m20240901_000015_create_visitor_pass;
mod m20240901_000016_create_cafeteria;
mod m20240901_000099_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240901_000001_create_user::Migration),
            Box::new(m20240901_000002_create_user_credentials::Migration),
            Box::new(m20240901_000003_create_course::Migration),
            Box::new(m20240901_000004_create_course_membership::Migration),
            Box::new(m20240901_000005_create_course_resource::Migration),
            Box::new(m20240901_000006_create_facility::Migration),
            Box::new(m20240901_000007_create_facility_booking::Migration),
            Box::new(m20240901_000008_create_resource::Migration),
            Box::new(m20240901_000009_create_booking::Migration),
            Box::new(m20240901_000010_create_attendance::Migration),
            Box::new(m20240901_000011_create_event::Migration),
            Box::new(m20240901_000012_create_notification::Migration),
            Box::new(m20240901_000013_create_feedback::Migration),
            Box::new(m20240901_000014_create_lost_found_item::Migration),
            Box::new(m20240901_000015_create_visitor_pass::Migration),
            Box::new(m20240901_000016_create_cafeteria::Migration),
            // Indexes should always be applied last
            Box::new(m20240901_000099_add_indexes::Migration),
        ]
    }
}
