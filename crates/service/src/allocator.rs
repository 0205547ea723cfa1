//! The booking allocator: the only writer of the bookings collection.
//!
//! Holds the [`BookingLedger`] behind an async mutex so the
//! check-then-append sequence of every mutation is atomic within the
//! process. Each mutation is written through to the store; when the write
//! fails the ledger change is undone and the storage error is returned.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use futsal_core::booking::{Booking, BookingStatus, CreateBooking};
use futsal_core::error::CoreError;
use futsal_core::ledger::{BookingLedger, BOOKING_ENTITY};
use futsal_core::slots::TimeSlot;
use futsal_core::types::Date;
use futsal_db::repositories::BookingRepo;
use futsal_db::KeyValueStore;
use tokio::sync::Mutex;

use crate::error::{ServiceError, ServiceResult};

pub struct BookingAllocator {
    store: Arc<dyn KeyValueStore>,
    ledger: Mutex<BookingLedger>,
}

impl fmt::Debug for BookingAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("BookingAllocator");
        // Skip the ledger rather than wait on a held lock.
        if let Ok(ledger) = self.ledger.try_lock() {
            debug.field("bookings", &ledger.len());
        }
        debug.finish_non_exhaustive()
    }
}

impl BookingAllocator {
    /// Load the booking sequence and retired ids from the store.
    ///
    /// Unlike the lenient repository reads, an unreadable bookings
    /// collection is an error here: starting from an empty ledger would
    /// overwrite it on the next write.
    pub async fn load(store: Arc<dyn KeyValueStore>) -> ServiceResult<Self> {
        let bookings = BookingRepo::fetch_all(store.as_ref())
            .await
            .map_err(ServiceError::Load)?;
        let retired = BookingRepo::fetch_retired(store.as_ref())
            .await
            .map_err(ServiceError::Load)?;
        let ledger = BookingLedger::from_parts(bookings, retired);
        tracing::info!(
            count = ledger.len(),
            retired = ledger.retired_ids().len(),
            "Loaded booking ledger"
        );
        Ok(Self {
            store,
            ledger: Mutex::new(ledger),
        })
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Catalog slots not held by a confirmed booking on `date`.
    pub async fn list_available_slots(&self, date: Date) -> Vec<TimeSlot> {
        let slots = self.ledger.lock().await.available_slots(date);
        tracing::debug!(%date, available = slots.len(), "Listed available slots");
        slots
    }

    pub async fn get_booking(&self, booking_id: &str) -> ServiceResult<Booking> {
        self.ledger
            .lock()
            .await
            .get(booking_id)
            .cloned()
            .ok_or_else(|| CoreError::not_found(BOOKING_ENTITY, booking_id).into())
    }

    /// Every booking in insertion order, cancelled ones included.
    pub async fn list_bookings(&self) -> Vec<Booking> {
        self.ledger.lock().await.bookings().to_vec()
    }

    pub async fn bookings_for_student(&self, student_id: &str) -> Vec<Booking> {
        self.ledger
            .lock()
            .await
            .for_student(student_id)
            .cloned()
            .collect()
    }

    /// Confirmed bookings on `date`.
    pub async fn bookings_on(&self, date: Date) -> Vec<Booking> {
        self.ledger.lock().await.on_date(date).cloned().collect()
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Allocate a slot. Rejected with the slot rule first, then the
    /// one-booking-per-day rule.
    pub async fn create_booking(&self, request: CreateBooking) -> ServiceResult<Booking> {
        let mut ledger = self.ledger.lock().await;

        let allocated = ledger.allocate(request, Utc::now(), &mut rand::rng());
        let booking = match allocated {
            Ok(booking) => booking,
            Err(e) => {
                tracing::info!(reason = %e, "Booking rejected");
                return Err(e.into());
            }
        };

        if let Err(e) = BookingRepo::save_all(self.store.as_ref(), ledger.bookings()).await {
            ledger.discard(&booking.booking_id);
            return Err(e.into());
        }

        tracing::info!(
            booking_id = %booking.booking_id,
            student_id = %booking.student_id,
            date = %booking.date,
            time = %booking.time,
            "Booking created"
        );
        Ok(booking)
    }

    /// Cancel a booking, freeing its slot. Cancelling twice is a no-op.
    pub async fn cancel_booking(&self, booking_id: &str) -> ServiceResult<Booking> {
        self.change_status(booking_id, BookingStatus::Cancelled).await
    }

    /// Confirm a cancelled booking again, provided its slot and its
    /// student's day are still free.
    pub async fn restore_booking(&self, booking_id: &str) -> ServiceResult<Booking> {
        self.change_status(booking_id, BookingStatus::Confirmed).await
    }

    /// Remove a booking permanently. Its id is never issued again.
    pub async fn delete_booking(&self, booking_id: &str) -> ServiceResult<Booking> {
        let mut ledger = self.ledger.lock().await;
        let removed = ledger.remove(booking_id)?;

        // Retire the id before dropping the record, so a failure in between
        // can only leave a retired id that is still live, never a reusable one.
        if let Err(e) = BookingRepo::save_retired(self.store.as_ref(), ledger.retired_ids()).await {
            ledger.reinstate(removed);
            return Err(e.into());
        }
        if let Err(e) = BookingRepo::save_all(self.store.as_ref(), ledger.bookings()).await {
            ledger.reinstate(removed);
            return Err(e.into());
        }

        tracing::info!(booking_id = %removed.booking.booking_id, "Booking deleted");
        Ok(removed.booking)
    }

    /// Remove every booking. All their ids are retired.
    pub async fn clear(&self) -> ServiceResult<usize> {
        let mut ledger = self.ledger.lock().await;
        let before = ledger.clone();
        let removed = ledger.clear().len();

        if let Err(e) = BookingRepo::save_retired(self.store.as_ref(), ledger.retired_ids()).await {
            *ledger = before;
            return Err(e.into());
        }
        if let Err(e) = BookingRepo::save_all(self.store.as_ref(), ledger.bookings()).await {
            *ledger = before;
            return Err(e.into());
        }

        tracing::info!(removed, "Bookings cleared");
        Ok(removed)
    }

    async fn change_status(
        &self,
        booking_id: &str,
        status: BookingStatus,
    ) -> ServiceResult<Booking> {
        let mut ledger = self.ledger.lock().await;
        let previous = ledger.set_status(booking_id, status)?;

        if previous != status {
            if let Err(e) = BookingRepo::save_all(self.store.as_ref(), ledger.bookings()).await {
                if let Err(undo) = ledger.set_status(booking_id, previous) {
                    tracing::error!(booking_id, error = %undo, "Failed to undo status change");
                }
                return Err(ServiceError::from(e));
            }
            tracing::info!(booking_id, ?previous, ?status, "Booking status changed");
        }

        ledger
            .get(booking_id)
            .cloned()
            .ok_or_else(|| CoreError::not_found(BOOKING_ENTITY, booking_id).into())
    }
}
