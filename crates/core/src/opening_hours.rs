//! Venue opening hours.

use chrono::NaiveTime;

/// The court opens with the first slot at 06:15.
pub const OPENS_AT: (u32, u32) = (6, 15);

/// The court closes at 23:00, after the last slot ends.
pub const CLOSES_AT: (u32, u32) = (23, 0);

fn at((hour, minute): (u32, u32)) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

/// Returns `true` if the venue is open at local time `now`.
pub fn is_open(now: NaiveTime) -> bool {
    now >= at(OPENS_AT) && now < at(CLOSES_AT)
}

/// Short status line for the header badge.
pub fn status_line(now: NaiveTime) -> &'static str {
    if is_open(now) {
        "Open · Closes at 11 PM"
    } else {
        "Closed · Opens at 6:15 AM"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn open_between_first_slot_and_close() {
        assert!(is_open(t(6, 15)));
        assert!(is_open(t(12, 0)));
        assert!(is_open(t(22, 59)));
    }

    #[test]
    fn closed_overnight() {
        assert!(!is_open(t(6, 14)));
        assert!(!is_open(t(23, 0)));
        assert!(!is_open(t(2, 0)));
        assert_eq!(status_line(t(2, 0)), "Closed · Opens at 6:15 AM");
    }
}
