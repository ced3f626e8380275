//! sea-orm entities for the campus domain plus the validation helpers that
//! guard every insert.

pub mod errors;
pub mod db;
pub mod schedule;
pub mod user;
pub mod user_credentials;
pub mod course;
pub mod course_enrollment;
pub mod course_teacher;
pub mod course_resource;
pub mod facility;
pub mod facility_booking;
pub mod resource;
pub mod booking;
pub mod attendance;
pub mod event;
pub mod event_participant;
pub mod notification;
pub mod feedback;
pub mod lost_found_item;
pub mod visitor_pass;
pub mod cafeteria_item;
pub mod cafeteria_order;
pub mod cafeteria_order_item;

#[cfg(test)]
mod tests;
