//! Repository for the `futsal_bookings` and `futsal_retired_booking_ids`
//! collections.

use std::collections::BTreeSet;

use futsal_core::booking::Booking;
use futsal_core::types::BookingId;

use super::{fetch, load_or_default, save};
use crate::collections::{BOOKINGS, RETIRED_BOOKING_IDS};
use crate::error::StoreError;
use crate::store::KeyValueStore;

pub struct BookingRepo;

impl BookingRepo {
    /// Bookings in insertion order, or none if the collection is unreadable.
    pub async fn load_all(store: &dyn KeyValueStore) -> Vec<Booking> {
        load_or_default(store, BOOKINGS).await
    }

    pub async fn fetch_all(store: &dyn KeyValueStore) -> Result<Vec<Booking>, StoreError> {
        fetch(store, BOOKINGS).await
    }

    pub async fn save_all(store: &dyn KeyValueStore, bookings: &[Booking]) -> Result<(), StoreError> {
        save(store, BOOKINGS, bookings).await
    }

    pub async fn fetch_retired(store: &dyn KeyValueStore) -> Result<BTreeSet<BookingId>, StoreError> {
        fetch(store, RETIRED_BOOKING_IDS).await
    }

    pub async fn save_retired(
        store: &dyn KeyValueStore,
        retired: &BTreeSet<BookingId>,
    ) -> Result<(), StoreError> {
        save(store, RETIRED_BOOKING_IDS, retired).await
    }
}
