//! Typed access to the persisted collections.
//!
//! Each repository is a unit struct whose associated functions take the
//! store, one per collection. Reads come in two flavours: `load_*` never
//! fails and falls back to the empty collection, `fetch_*` surfaces the
//! failure so a read-modify-write never overwrites data it could not read.

pub mod admin_repo;
pub mod booking_repo;
pub mod security_log_repo;
pub mod session_repo;
pub mod student_repo;

pub use admin_repo::AdminRepo;
pub use booking_repo::BookingRepo;
pub use security_log_repo::SecurityLogRepo;
pub use session_repo::SessionRepo;
pub use student_repo::StudentRepo;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;
use crate::store::KeyValueStore;

/// Read and decode a collection. An absent key yields the empty default.
pub(crate) async fn fetch<T>(store: &dyn KeyValueStore, key: &str) -> Result<T, StoreError>
where
    T: DeserializeOwned + Default,
{
    match store.get(key).await? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(T::default()),
    }
}

/// Like [`fetch`], but any failure is logged and replaced by the default.
pub(crate) async fn load_or_default<T>(store: &dyn KeyValueStore, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    match fetch(store, key).await {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(collection = key, error = %e, "Collection unreadable, using empty default");
            T::default()
        }
    }
}

/// Encode and write a collection.
pub(crate) async fn save<T>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    if let Err(e) = store.set(key, &raw).await {
        tracing::error!(collection = key, error = %e, "Failed to save collection");
        return Err(e);
    }
    Ok(())
}
