//! Admin dashboard counters.

use serde::Serialize;

use crate::booking::{Booking, BookingStatus};
use crate::student::{Student, StudentStatus};
use crate::types::Date;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub total_students: usize,
    pub active_students: usize,
    pub banned_students: usize,
    pub total_bookings: usize,
    pub confirmed_bookings: usize,
    pub cancelled_bookings: usize,
    /// Confirmed bookings dated today.
    pub today_bookings: usize,
}

impl Statistics {
    pub fn compute<'a>(
        students: impl IntoIterator<Item = &'a Student>,
        bookings: &[Booking],
        today: Date,
    ) -> Self {
        let mut stats = Self::default();
        for student in students {
            stats.total_students += 1;
            match student.status {
                StudentStatus::Active => stats.active_students += 1,
                StudentStatus::Banned => stats.banned_students += 1,
            }
        }
        for booking in bookings {
            stats.total_bookings += 1;
            match booking.status {
                BookingStatus::Confirmed => {
                    stats.confirmed_bookings += 1;
                    if booking.date == today {
                        stats.today_bookings += 1;
                    }
                }
                BookingStatus::Cancelled => stats.cancelled_bookings += 1,
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn student(id: &str, status: StudentStatus) -> Student {
        Student {
            id: id.to_string(),
            name: id.to_string(),
            program: "BCA".to_string(),
            password_hash: String::new(),
            email: format!("{id}@example.edu"),
            phone: "9800000000".to_string(),
            registered_date: "2024-01-15".parse().unwrap(),
            status,
            ban_history: Vec::new(),
        }
    }

    fn booking(id: &str, day: &str, status: BookingStatus) -> Booking {
        Booking {
            booking_id: id.to_string(),
            student_id: "S1".to_string(),
            student_name: "S1".to_string(),
            date: day.parse().unwrap(),
            time: "10:15".parse().unwrap(),
            team_name: "Team".to_string(),
            phone: "9800000000".to_string(),
            booking_date: Utc::now(),
            status,
        }
    }

    #[test]
    fn counts_students_and_bookings() {
        let students = vec![
            student("S1", StudentStatus::Active),
            student("S2", StudentStatus::Banned),
            student("S3", StudentStatus::Active),
        ];
        let bookings = vec![
            booking("A", "2025-01-10", BookingStatus::Confirmed),
            booking("B", "2025-01-10", BookingStatus::Cancelled),
            booking("C", "2025-01-11", BookingStatus::Confirmed),
        ];

        let stats = Statistics::compute(&students, &bookings, "2025-01-10".parse().unwrap());
        assert_eq!(
            stats,
            Statistics {
                total_students: 3,
                active_students: 2,
                banned_students: 1,
                total_bookings: 3,
                confirmed_bookings: 2,
                cancelled_bookings: 1,
                today_bookings: 1,
            }
        );
    }

    #[test]
    fn empty_collections() {
        let stats = Statistics::compute(&Vec::new(), &[], "2025-01-10".parse().unwrap());
        assert_eq!(stats, Statistics::default());
    }
}
