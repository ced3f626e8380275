//! Campus business rules on top of the `models` entities.
//! - Scheduling-heavy areas (auth, facility bookings, attendance) sit behind
//!   repository traits with in-memory mocks for unit tests.
//! - Everything else is plain async functions over a `DatabaseConnection`.

pub mod errors;
pub mod pagination;
pub mod auth;
pub mod facility_booking;
pub mod attendance;

pub mod user_service;
pub mod course_service;
pub mod course_resource_service;
pub mod facility_service;
pub mod resource_service;
pub mod booking_service;
pub mod event_service;
pub mod notification_service;
pub mod feedback_service;
pub mod lost_found_service;
pub mod visitor_pass_service;
pub mod cafeteria_service;

#[cfg(test)]
pub mod test_support;
