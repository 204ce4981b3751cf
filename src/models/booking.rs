//! Booking records and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Upstream status strings carry this prefix (e.g. `sln-b-approved`).
pub const STATUS_PREFIX: &str = "sln-b-";

/// A booking as returned by `/bookings`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub date: NaiveDate,
    pub time: String,
    /// Raw upstream status, prefix convention included.
    pub status: String,
    pub amount: f64,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub services: Vec<BookingService>,
    #[serde(default)]
    pub admin_note: Option<String>,
}

/// A service line embedded in a booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingService {
    #[serde(default)]
    pub service_id: Option<i64>,
    pub service_name: String,
    #[serde(default)]
    pub start_at: Option<String>,
    #[serde(default)]
    pub service_price: f64,
}

/// Aggregate booking figures from `/bookings/stats`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingStats {
    pub total_bookings: u64,
    pub total_revenue: f64,
    #[serde(default)]
    pub approved: u64,
    #[serde(default)]
    pub cancelled: u64,
}

/// Payload for `PUT /bookings/{id}`.
///
/// The upstream API requires the full tuple even when only the admin
/// note changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBooking {
    pub id: i64,
    pub date: NaiveDate,
    pub time: String,
    pub status: String,
    pub admin_note: String,
}

impl Booking {
    /// Status with the upstream prefix stripped, title-cased for display
    /// (`sln-b-approved` -> `Approved`).
    pub fn display_status(&self) -> String {
        let stripped = self.status.strip_prefix(STATUS_PREFIX).unwrap_or(&self.status);
        let mut chars = stripped.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    }

    /// First service line, if any. Bookings from this API carry at most
    /// a handful of services and the first one is the headline.
    pub fn primary_service(&self) -> Option<&BookingService> {
        self.services.first()
    }

    /// Build the update payload for an admin-note edit, carrying the
    /// booking's current date/time/status through unchanged.
    pub fn note_update(&self, admin_note: impl Into<String>) -> UpdateBooking {
        UpdateBooking {
            id: self.id,
            date: self.date,
            time: self.time.clone(),
            status: self.status.clone(),
            admin_note: admin_note.into(),
        }
    }
}

/// Sum of booking amounts, for the dashboard revenue card.
pub fn total_revenue(bookings: &[Booking]) -> f64 {
    bookings.iter().map(|b| b.amount).sum()
}
