//! Typed records for the salon API, validated at the boundary by serde.

pub mod booking;
pub mod customer;
pub mod service;

pub use booking::{Booking, BookingService, BookingStats, UpdateBooking};
pub use customer::Customer;
pub use service::Service;
