//! Indexed booking ledger: the slot-allocation rules.
//!
//! The ledger owns the ordered booking sequence exactly as it is persisted,
//! plus two indexes over the confirmed bookings:
//!
//! - `(date, time)` -> booking id, so at most one confirmed booking holds a slot.
//! - `(student_id, date)` -> booking id, so a student holds at most one slot a day.
//!
//! Cancelled bookings are never indexed, which is what frees their slot.
//! Ids of deleted bookings are kept in a retired set and never issued again.
//!
//! The ledger is pure in-memory state. Persisting it (and undoing a mutation
//! when the write fails) is the caller's job; every mutating method has an
//! inverse for that purpose.

use std::collections::{BTreeSet, HashMap};

use rand::Rng;

use crate::booking::{generate_booking_id, Booking, BookingStatus, CreateBooking};
use crate::error::{BookingConflict, CoreError};
use crate::slots::TimeSlot;
use crate::types::{BookingId, Date, StudentId, Timestamp};

/// Entity name used in not-found errors.
pub const BOOKING_ENTITY: &str = "Booking";

/// Upper bound on id regeneration attempts before giving up.
const MAX_ID_ATTEMPTS: usize = 64;

#[derive(Debug, Clone, Default)]
pub struct BookingLedger {
    bookings: Vec<Booking>,
    by_slot: HashMap<(Date, TimeSlot), BookingId>,
    by_student_day: HashMap<(StudentId, Date), BookingId>,
    retired: BTreeSet<BookingId>,
}

/// Where a deleted booking used to sit, so the deletion can be undone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removed {
    pub position: usize,
    pub booking: Booking,
}

impl BookingLedger {
    /// Rebuild a ledger from persisted state.
    ///
    /// Stored data that already breaks the uniqueness rules (written by an
    /// older or concurrent writer) is kept as-is; the first confirmed booking
    /// for a key owns the index entry.
    pub fn from_parts(bookings: Vec<Booking>, retired: BTreeSet<BookingId>) -> Self {
        let mut ledger = Self {
            bookings,
            retired,
            ..Self::default()
        };
        for i in 0..ledger.bookings.len() {
            if ledger.bookings[i].holds_slot() {
                let booking = ledger.bookings[i].clone();
                ledger.index_if_free(&booking);
            }
        }
        ledger
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// All bookings in insertion order, cancelled ones included.
    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    /// Ids of deleted bookings.
    pub fn retired_ids(&self) -> &BTreeSet<BookingId> {
        &self.retired
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }

    pub fn get(&self, booking_id: &str) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.booking_id == booking_id)
    }

    /// Returns `true` if `booking_id` is live or has ever been deleted.
    pub fn is_issued(&self, booking_id: &str) -> bool {
        self.retired.contains(booking_id) || self.get(booking_id).is_some()
    }

    /// Every booking of one student, cancelled ones included.
    pub fn for_student<'a>(&'a self, student_id: &'a str) -> impl Iterator<Item = &'a Booking> {
        self.bookings.iter().filter(move |b| b.student_id == student_id)
    }

    /// Confirmed bookings on `date`.
    pub fn on_date(&self, date: Date) -> impl Iterator<Item = &Booking> {
        self.bookings
            .iter()
            .filter(move |b| b.date == date && b.holds_slot())
    }

    /// Catalog slots not held by a confirmed booking on `date`, in catalog order.
    pub fn available_slots(&self, date: Date) -> Vec<TimeSlot> {
        TimeSlot::all()
            .filter(|slot| !self.by_slot.contains_key(&(date, *slot)))
            .collect()
    }

    /// Check both uniqueness rules for a prospective confirmed booking.
    ///
    /// The slot rule is checked first; its violation wins.
    pub fn check(&self, student_id: &str, date: Date, time: TimeSlot) -> Result<(), BookingConflict> {
        if self.by_slot.contains_key(&(date, time)) {
            return Err(BookingConflict::SlotTaken { date, time });
        }
        if self
            .by_student_day
            .contains_key(&(student_id.to_string(), date))
        {
            return Err(BookingConflict::StudentAlreadyBooked {
                student_id: student_id.to_string(),
                date,
            });
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Allocate a slot: check the rules, issue a fresh id, and append a
    /// confirmed booking. Returns a copy of the new booking.
    pub fn allocate<R: Rng + ?Sized>(
        &mut self,
        request: CreateBooking,
        now: Timestamp,
        rng: &mut R,
    ) -> Result<Booking, CoreError> {
        self.check(&request.student_id, request.date, request.time)?;
        let booking_id = self.issue_id(now, rng)?;

        let booking = Booking {
            booking_id,
            student_id: request.student_id,
            student_name: request.student_name,
            date: request.date,
            time: request.time,
            team_name: request.team_name,
            phone: request.phone,
            booking_date: now,
            status: BookingStatus::Confirmed,
        };
        self.index(&booking);
        self.bookings.push(booking.clone());
        Ok(booking)
    }

    /// Undo [`allocate`](Self::allocate). The id is not retired because it
    /// was never persisted.
    pub fn discard(&mut self, booking_id: &str) -> Option<Booking> {
        let position = self.position(booking_id)?;
        let booking = self.bookings.remove(position);
        self.unindex(&booking);
        Some(booking)
    }

    /// Change a booking's status and return the status it had before.
    ///
    /// Setting the status it already has is a no-op. Confirming a cancelled
    /// booking re-checks both rules, since its slot or its student's day may
    /// have been taken in the meantime.
    pub fn set_status(
        &mut self,
        booking_id: &str,
        status: BookingStatus,
    ) -> Result<BookingStatus, CoreError> {
        let position = self
            .position(booking_id)
            .ok_or_else(|| CoreError::not_found(BOOKING_ENTITY, booking_id))?;
        let previous = self.bookings[position].status;
        if previous == status {
            return Ok(previous);
        }

        match status {
            BookingStatus::Cancelled => {
                let booking = self.bookings[position].clone();
                self.unindex(&booking);
            }
            BookingStatus::Confirmed => {
                let booking = &self.bookings[position];
                self.check(&booking.student_id, booking.date, booking.time)?;
                let booking = booking.clone();
                self.index(&booking);
            }
        }
        self.bookings[position].status = status;
        Ok(previous)
    }

    /// Remove a booking permanently and retire its id.
    pub fn remove(&mut self, booking_id: &str) -> Result<Removed, CoreError> {
        let position = self
            .position(booking_id)
            .ok_or_else(|| CoreError::not_found(BOOKING_ENTITY, booking_id))?;
        let booking = self.bookings.remove(position);
        self.unindex(&booking);
        self.retired.insert(booking.booking_id.clone());
        Ok(Removed { position, booking })
    }

    /// Undo [`remove`](Self::remove).
    pub fn reinstate(&mut self, removed: Removed) {
        let Removed { position, booking } = removed;
        self.retired.remove(&booking.booking_id);
        if booking.holds_slot() {
            self.index_if_free(&booking);
        }
        let position = position.min(self.bookings.len());
        self.bookings.insert(position, booking);
    }

    /// Remove every booking and retire all their ids. Returns the bookings
    /// that were removed. Undo by restoring a clone taken beforehand.
    pub fn clear(&mut self) -> Vec<Booking> {
        self.by_slot.clear();
        self.by_student_day.clear();
        let removed = std::mem::take(&mut self.bookings);
        self.retired
            .extend(removed.iter().map(|b| b.booking_id.clone()));
        removed
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn issue_id<R: Rng + ?Sized>(&self, now: Timestamp, rng: &mut R) -> Result<BookingId, CoreError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = generate_booking_id(now, rng);
            if !self.is_issued(&candidate) {
                return Ok(candidate);
            }
        }
        Err(CoreError::Internal(format!(
            "Could not issue a unique booking id after {MAX_ID_ATTEMPTS} attempts"
        )))
    }

    fn position(&self, booking_id: &str) -> Option<usize> {
        self.bookings.iter().position(|b| b.booking_id == booking_id)
    }

    fn index(&mut self, booking: &Booking) {
        self.by_slot
            .insert((booking.date, booking.time), booking.booking_id.clone());
        self.by_student_day.insert(
            (booking.student_id.clone(), booking.date),
            booking.booking_id.clone(),
        );
    }

    fn index_if_free(&mut self, booking: &Booking) {
        self.by_slot
            .entry((booking.date, booking.time))
            .or_insert_with(|| booking.booking_id.clone());
        self.by_student_day
            .entry((booking.student_id.clone(), booking.date))
            .or_insert_with(|| booking.booking_id.clone());
    }

    /// Drop index entries owned by `booking`. Entries owned by another
    /// booking with the same key are left alone.
    ///
    /// Legacy data may hold several confirmed bookings under one key. When
    /// the owner goes, the entry passes to the next confirmed booking with
    /// that key, so the slot or day stays taken.
    fn unindex(&mut self, booking: &Booking) {
        let slot_key = (booking.date, booking.time);
        if self.by_slot.get(&slot_key) == Some(&booking.booking_id) {
            let successor = self
                .bookings
                .iter()
                .find(|b| {
                    b.booking_id != booking.booking_id
                        && b.holds_slot()
                        && (b.date, b.time) == slot_key
                })
                .map(|b| b.booking_id.clone());
            match successor {
                Some(id) => self.by_slot.insert(slot_key, id),
                None => self.by_slot.remove(&slot_key),
            };
        }

        let day_key = (booking.student_id.clone(), booking.date);
        if self.by_student_day.get(&day_key) == Some(&booking.booking_id) {
            let successor = self
                .bookings
                .iter()
                .find(|b| {
                    b.booking_id != booking.booking_id
                        && b.holds_slot()
                        && b.student_id == day_key.0
                        && b.date == day_key.1
                })
                .map(|b| b.booking_id.clone());
            match successor {
                Some(id) => self.by_student_day.insert(day_key, id),
                None => self.by_student_day.remove(&day_key),
            };
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
