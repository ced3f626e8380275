//! Attendance tracking with same-day duplicate protection.

pub mod repository;
pub mod service;

pub use service::{AttendanceService, AttendanceUpdate, BulkAttendance, NewAttendance};
