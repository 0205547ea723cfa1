/// Student identifiers are college registration codes such as `TIC001`.
pub type StudentId = String;

/// Booking identifiers, see [`crate::booking::generate_booking_id`].
pub type BookingId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates carry no time zone.
pub type Date = chrono::NaiveDate;
