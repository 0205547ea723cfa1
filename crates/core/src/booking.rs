//! Booking records, identifiers, and per-student views.

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::slots::TimeSlot;
use crate::types::{BookingId, Date, StudentId, Timestamp};

// ---------------------------------------------------------------------------
// Identifier format
// ---------------------------------------------------------------------------

/// Every booking id starts with the college prefix.
pub const BOOKING_ID_PREFIX: &str = "TIC";

/// Number of timestamp digits following the prefix.
pub const BOOKING_ID_TIMESTAMP_DIGITS: usize = 6;

/// Number of random characters closing the id.
pub const BOOKING_ID_RANDOM_CHARS: usize = 3;

const BOOKING_ID_CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

static BOOKING_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^TIC[0-9]{6}[0-9A-Z]{3}$").expect("valid regex"));

/// Build a booking id from the last six digits of the millisecond timestamp
/// and three random uppercase base-36 characters.
///
/// Uniqueness is not guaranteed here; the ledger regenerates on collision.
pub fn generate_booking_id<R: Rng + ?Sized>(now: Timestamp, rng: &mut R) -> BookingId {
    let millis = now.timestamp_millis().rem_euclid(1_000_000);
    let suffix: String = (0..BOOKING_ID_RANDOM_CHARS)
        .map(|_| BOOKING_ID_CHARSET[rng.random_range(0..BOOKING_ID_CHARSET.len())] as char)
        .collect();
    format!("{BOOKING_ID_PREFIX}{millis:0width$}{suffix}", width = BOOKING_ID_TIMESTAMP_DIGITS)
}

/// Returns `true` if `id` has the shape produced by [`generate_booking_id`].
pub fn is_valid_booking_id(id: &str) -> bool {
    BOOKING_ID_RE.is_match(id)
}

// ---------------------------------------------------------------------------
// Contact validation
// ---------------------------------------------------------------------------

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9][0-9]{0,15}$").expect("valid regex"));

/// Validate a contact phone number. Whitespace is ignored.
pub fn validate_phone(phone: &str) -> Result<(), String> {
    let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    if PHONE_RE.is_match(&compact) {
        Ok(())
    } else {
        Err("Please enter a valid phone number".to_string())
    }
}

// ---------------------------------------------------------------------------
// Booking entity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Confirmed,
    Cancelled,
}

/// A reservation of one slot on one date.
///
/// `student_id` is a lookup key only; deleting the student leaves the
/// booking (and its denormalized `student_name`) in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub booking_id: BookingId,
    pub student_id: StudentId,
    pub student_name: String,
    pub date: Date,
    pub time: TimeSlot,
    pub team_name: String,
    pub phone: String,
    pub booking_date: Timestamp,
    /// Records written before statuses existed count as confirmed.
    #[serde(default)]
    pub status: BookingStatus,
}

impl Booking {
    /// Confirmed bookings hold their slot; cancelled ones do not.
    pub fn holds_slot(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }
}

/// Request to allocate one slot for one student.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBooking {
    pub student_id: StudentId,
    pub student_name: String,
    pub date: Date,
    pub time: TimeSlot,
    pub team_name: String,
    pub phone: String,
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// A student's bookings split the way the dashboard lists them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BookingOverview {
    /// Confirmed, dated today or later.
    pub active: Vec<Booking>,
    /// Confirmed, dated before today.
    pub past: Vec<Booking>,
    pub cancelled: Vec<Booking>,
}

impl BookingOverview {
    pub fn partition(bookings: impl IntoIterator<Item = Booking>, today: Date) -> Self {
        let mut overview = Self::default();
        for booking in bookings {
            match booking.status {
                BookingStatus::Cancelled => overview.cancelled.push(booking),
                BookingStatus::Confirmed if booking.date >= today => overview.active.push(booking),
                BookingStatus::Confirmed => overview.past.push(booking),
            }
        }
        overview
    }
}

/// Confirmed bookings dated `today`.
pub fn todays_bookings<'a>(bookings: &'a [Booking], today: Date) -> Vec<&'a Booking> {
    bookings
        .iter()
        .filter(|b| b.holds_slot() && b.date == today)
        .collect()
}

/// Confirmed bookings dated after `today`, soonest first.
pub fn upcoming_bookings<'a>(bookings: &'a [Booking], today: Date) -> Vec<&'a Booking> {
    let mut upcoming: Vec<&Booking> = bookings
        .iter()
        .filter(|b| b.holds_slot() && b.date > today)
        .collect();
    upcoming.sort_by_key(|b| (b.date, b.time));
    upcoming
}

/// Number of bookings shown as recent activity.
pub const RECENT_ACTIVITY_LIMIT: usize = 10;

/// The `limit` most recently made bookings, cancelled ones included,
/// newest `booking_date` first. Ties keep insertion order.
pub fn recent_activity(bookings: &[Booking], limit: usize) -> Vec<&Booking> {
    let mut recent: Vec<&Booking> = bookings.iter().collect();
    recent.sort_by(|a, b| b.booking_date.cmp(&a.booking_date));
    recent.truncate(limit);
    recent
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn booking(id: &str, day: &str, time: &str, status: BookingStatus) -> Booking {
        Booking {
            booking_id: id.to_string(),
            student_id: "TIC001".to_string(),
            student_name: "Test Student".to_string(),
            date: date(day),
            time: time.parse().unwrap(),
            team_name: "Team".to_string(),
            phone: "9800000000".to_string(),
            booking_date: Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap(),
            status,
        }
    }

    // -----------------------------------------------------------------------
    // Identifiers
    // -----------------------------------------------------------------------

    #[test]
    fn generated_id_has_expected_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let now = Utc.with_ymd_and_hms(2025, 1, 10, 9, 30, 0).unwrap();
        let id = generate_booking_id(now, &mut rng);

        assert_eq!(id.len(), 3 + 6 + 3);
        assert!(id.starts_with("TIC"));
        assert!(is_valid_booking_id(&id), "unexpected id {id}");
    }

    #[test]
    fn generated_id_uses_last_six_timestamp_digits() {
        let mut rng = StdRng::seed_from_u64(1);
        let now = Utc.timestamp_millis_opt(1_736_500_123_456).unwrap();
        let id = generate_booking_id(now, &mut rng);
        assert_eq!(&id[3..9], "123456");
    }

    #[test]
    fn generated_id_pads_small_timestamps() {
        let mut rng = StdRng::seed_from_u64(1);
        let now = Utc.timestamp_millis_opt(1_736_500_000_042).unwrap();
        let id = generate_booking_id(now, &mut rng);
        assert_eq!(&id[3..9], "000042");
    }

    #[test]
    fn id_validation_rejects_malformed() {
        assert!(is_valid_booking_id("TIC123456ABC"));
        assert!(!is_valid_booking_id("TIC123456abc"));
        assert!(!is_valid_booking_id("XYZ123456ABC"));
        assert!(!is_valid_booking_id("TIC12345ABC"));
        assert!(!is_valid_booking_id(""));
    }

    // -----------------------------------------------------------------------
    // Phone validation
    // -----------------------------------------------------------------------

    #[test]
    fn phone_accepts_local_and_international() {
        assert!(validate_phone("9800000000").is_ok());
        assert!(validate_phone("+977 980 000 0000").is_ok());
    }

    #[test]
    fn phone_rejects_leading_zero_and_letters() {
        assert!(validate_phone("0980000000").is_err());
        assert!(validate_phone("98000abc").is_err());
        assert!(validate_phone("").is_err());
        assert!(validate_phone("12345678901234567").is_err());
    }

    // -----------------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------------

    #[test]
    fn booking_uses_camel_case_fields() {
        let b = booking("TIC000001AAA", "2025-01-10", "10:15", BookingStatus::Confirmed);
        let json = serde_json::to_value(&b).unwrap();
        assert_eq!(json["bookingId"], "TIC000001AAA");
        assert_eq!(json["studentId"], "TIC001");
        assert_eq!(json["date"], "2025-01-10");
        assert_eq!(json["time"], "10:15");
        assert_eq!(json["status"], "confirmed");
    }

    #[test]
    fn missing_status_defaults_to_confirmed() {
        let json = serde_json::json!({
            "bookingId": "TIC000001AAA",
            "studentId": "TIC001",
            "studentName": "Test Student",
            "date": "2025-01-10",
            "time": "10:15",
            "teamName": "Team",
            "phone": "9800000000",
            "bookingDate": "2025-01-01T08:00:00Z"
        });
        let b: Booking = serde_json::from_value(json).unwrap();
        assert_eq!(b.status, BookingStatus::Confirmed);
        assert!(b.holds_slot());
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    #[test]
    fn overview_partitions_by_status_and_date() {
        let today = date("2025-01-10");
        let bookings = vec![
            booking("A", "2025-01-12", "10:15", BookingStatus::Confirmed),
            booking("B", "2025-01-10", "11:15", BookingStatus::Confirmed),
            booking("C", "2025-01-05", "10:15", BookingStatus::Confirmed),
            booking("D", "2025-01-12", "12:15", BookingStatus::Cancelled),
        ];

        let overview = BookingOverview::partition(bookings, today);
        let ids = |v: &[Booking]| v.iter().map(|b| b.booking_id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&overview.active), vec!["A", "B"]);
        assert_eq!(ids(&overview.past), vec!["C"]);
        assert_eq!(ids(&overview.cancelled), vec!["D"]);
    }

    #[test]
    fn today_and_upcoming_skip_cancelled() {
        let today = date("2025-01-10");
        let bookings = vec![
            booking("A", "2025-01-10", "10:15", BookingStatus::Confirmed),
            booking("B", "2025-01-10", "11:15", BookingStatus::Cancelled),
            booking("C", "2025-01-13", "06:15", BookingStatus::Confirmed),
            booking("D", "2025-01-11", "20:15", BookingStatus::Confirmed),
        ];

        let today_ids: Vec<_> = todays_bookings(&bookings, today)
            .iter()
            .map(|b| b.booking_id.as_str())
            .collect();
        assert_eq!(today_ids, vec!["A"]);

        let upcoming_ids: Vec<_> = upcoming_bookings(&bookings, today)
            .iter()
            .map(|b| b.booking_id.as_str())
            .collect();
        assert_eq!(upcoming_ids, vec!["D", "C"]);
    }

    #[test]
    fn recent_activity_newest_first_and_limited() {
        let mut bookings = Vec::new();
        for (i, status) in [BookingStatus::Confirmed, BookingStatus::Cancelled, BookingStatus::Confirmed]
            .into_iter()
            .enumerate()
        {
            let mut b = booking(&format!("TIC00000{i}AAA"), "2025-01-10", "10:15", status);
            b.booking_date = Utc.with_ymd_and_hms(2025, 1, 5 + i as u32, 8, 0, 0).unwrap();
            bookings.push(b);
        }

        let recent = recent_activity(&bookings, 2);
        let ids: Vec<&str> = recent.iter().map(|b| b.booking_id.as_str()).collect();
        assert_eq!(ids, ["TIC000002AAA", "TIC000001AAA"]);

        assert_eq!(recent_activity(&bookings, RECENT_ACTIVITY_LIMIT).len(), 3);
        assert!(recent_activity(&[], RECENT_ACTIVITY_LIMIT).is_empty());
    }
}
