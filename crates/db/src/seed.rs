//! First-run seeding.

use futsal_core::admin::Admin;

use crate::collections::{ADMINS, BOOKINGS, RETIRED_BOOKING_IDS, SECURITY_LOGS, STUDENTS};
use crate::error::StoreError;
use crate::repositories::AdminRepo;
use crate::store::KeyValueStore;

/// Write an empty document for every collection that does not exist yet.
/// Existing collections are left untouched.
pub async fn ensure_collections(store: &dyn KeyValueStore) -> Result<(), StoreError> {
    let defaults = [
        (STUDENTS, "{}"),
        (ADMINS, "{}"),
        (BOOKINGS, "[]"),
        (SECURITY_LOGS, "[]"),
        (RETIRED_BOOKING_IDS, "[]"),
    ];
    for (key, empty) in defaults {
        if store.get(key).await?.is_none() {
            store.set(key, empty).await?;
            tracing::debug!(collection = key, "Initialized empty collection");
        }
    }
    Ok(())
}

/// Insert `admin` unless an admin with that username already exists.
///
/// Returns `true` if the admin was inserted.
pub async fn ensure_admin(store: &dyn KeyValueStore, admin: Admin) -> Result<bool, StoreError> {
    let admins = AdminRepo::fetch_all(store).await?;
    if admins.contains_key(&admin.username) {
        return Ok(false);
    }
    AdminRepo::upsert(store, &admin).await?;
    tracing::info!(username = %admin.username, role = %admin.role, "Seeded admin account");
    Ok(true)
}
