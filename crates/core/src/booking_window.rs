//! How far ahead students may book.
//!
//! Bookings are accepted from tomorrow through `horizon_days` days from
//! today, inclusive. The allocator itself accepts any date; this window is
//! applied by the student-facing booking desk.

use chrono::Days;

use crate::types::Date;

/// Default number of days ahead a booking may be made.
pub const DEFAULT_HORIZON_DAYS: u64 = 5;

/// First date that can be booked on `today`.
pub fn earliest_bookable(today: Date) -> Date {
    today.checked_add_days(Days::new(1)).unwrap_or(today)
}

/// Last date that can be booked on `today`.
pub fn latest_bookable(today: Date, horizon_days: u64) -> Date {
    today
        .checked_add_days(Days::new(horizon_days))
        .unwrap_or(today)
}

/// Validate a requested booking date against the window.
pub fn validate_booking_date(date: Date, today: Date, horizon_days: u64) -> Result<(), String> {
    if date < today {
        return Err("Cannot book dates in the past. Please select a future date.".to_string());
    }
    if date < earliest_bookable(today) {
        return Err(format!(
            "Same-day bookings are not accepted. Please select a date between 1 and {horizon_days} days from today."
        ));
    }
    if date > latest_bookable(today, horizon_days) {
        return Err(format!(
            "Please select a date between 1 and {horizon_days} days from today. You cannot book more than {horizon_days} days in advance."
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    #[test]
    fn window_bounds() {
        let today = date("2025-01-10");
        assert_eq!(earliest_bookable(today), date("2025-01-11"));
        assert_eq!(latest_bookable(today, 5), date("2025-01-15"));
    }

    #[test]
    fn tomorrow_and_last_day_accepted() {
        let today = date("2025-01-10");
        assert!(validate_booking_date(date("2025-01-11"), today, 5).is_ok());
        assert!(validate_booking_date(date("2025-01-15"), today, 5).is_ok());
    }

    #[test]
    fn today_rejected() {
        let err = validate_booking_date(date("2025-01-10"), date("2025-01-10"), 5).unwrap_err();
        assert!(err.contains("Same-day"));
    }

    #[test]
    fn past_rejected() {
        let err = validate_booking_date(date("2025-01-09"), date("2025-01-10"), 5).unwrap_err();
        assert!(err.contains("past"));
    }

    #[test]
    fn beyond_horizon_rejected() {
        let err = validate_booking_date(date("2025-01-16"), date("2025-01-10"), 5).unwrap_err();
        assert!(err.contains("more than 5 days"));
    }

    #[test]
    fn window_crosses_month_end() {
        let today = date("2025-01-29");
        assert!(validate_booking_date(date("2025-02-03"), today, 5).is_ok());
        assert!(validate_booking_date(date("2025-02-04"), today, 5).is_err());
    }
}
