//! Student-facing booking policy in front of the allocator.
//!
//! The allocator accepts any date and any caller. The desk adds what a
//! student-facing surface must check first: who is logged in, that the form
//! is complete and well-formed, and that the date is inside the booking
//! window.

use std::sync::Arc;

use chrono::NaiveDate;
use futsal_core::booking::{validate_phone, Booking, BookingOverview, CreateBooking};
use futsal_core::booking_window::validate_booking_date;
use futsal_core::error::CoreError;
use futsal_core::ledger::BOOKING_ENTITY;
use futsal_core::slots::TimeSlot;
use futsal_core::types::Date;
use serde::Deserialize;

use crate::allocator::BookingAllocator;
use crate::error::ServiceResult;
use crate::session::SessionManager;

/// The booking form as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingForm {
    /// ISO date, `YYYY-MM-DD`.
    pub date: String,
    /// Slot start label, e.g. `"18:15"`.
    pub time: String,
    pub team_name: String,
    pub phone: String,
}

pub struct BookingDesk {
    allocator: Arc<BookingAllocator>,
    sessions: Arc<SessionManager>,
    horizon_days: u64,
}

impl BookingDesk {
    pub fn new(
        allocator: Arc<BookingAllocator>,
        sessions: Arc<SessionManager>,
        horizon_days: u64,
    ) -> Self {
        Self {
            allocator,
            sessions,
            horizon_days,
        }
    }

    /// Book a slot for the logged-in student.
    pub async fn book(&self, form: BookingForm, today: Date) -> ServiceResult<Booking> {
        // 1. Only a logged-in student may book.
        let student = self.sessions.require_student().await?;

        // 2. Every field is required.
        let date = form.date.trim();
        let time = form.time.trim();
        let team_name = form.team_name.trim();
        let phone = form.phone.trim();
        if date.is_empty() || time.is_empty() || team_name.is_empty() || phone.is_empty() {
            return Err(CoreError::Validation("Please fill in all required fields".into()).into());
        }

        // 3. Field formats.
        validate_phone(phone).map_err(CoreError::Validation)?;
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| CoreError::Validation("Please select a valid date".into()))?;
        let time: TimeSlot = time.parse().map_err(CoreError::from)?;

        // 4. Booking window.
        validate_booking_date(date, today, self.horizon_days).map_err(CoreError::Validation)?;

        // 5. Allocate.
        self.allocator
            .create_booking(CreateBooking {
                student_id: student.student_id,
                student_name: student.name,
                date,
                time,
                team_name: team_name.to_string(),
                phone: phone.to_string(),
            })
            .await
    }

    /// The logged-in student's bookings, split into active, past, and
    /// cancelled.
    pub async fn my_bookings(&self, today: Date) -> ServiceResult<BookingOverview> {
        let student = self.sessions.require_student().await?;
        let bookings = self.allocator.bookings_for_student(&student.student_id).await;
        Ok(BookingOverview::partition(bookings, today))
    }

    /// Cancel one of the logged-in student's own bookings.
    pub async fn cancel_my_booking(&self, booking_id: &str) -> ServiceResult<Booking> {
        let student = self.sessions.require_student().await?;
        let booking = self.allocator.get_booking(booking_id).await?;
        if booking.student_id != student.student_id {
            // Someone else's booking is reported as missing.
            return Err(CoreError::not_found(BOOKING_ENTITY, booking_id).into());
        }
        self.allocator.cancel_booking(booking_id).await
    }

    /// Free slots on `date`, for the booking form's time picker.
    pub async fn available_slots(&self, date: Date) -> Vec<TimeSlot> {
        self.allocator.list_available_slots(date).await
    }
}
