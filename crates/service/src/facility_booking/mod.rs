//! Facility bookings: the slot-conflict rule lives in [`service`], persistence
//! sits behind [`repository::FacilityBookingRepository`].

pub mod repository;
pub mod service;

pub use service::FacilityBookingService;
