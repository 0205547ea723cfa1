//! Repository for the capped `security_logs` collection.

use futsal_core::security_event::{cap_events, SecurityEvent};

use super::{load_or_default, save};
use crate::collections::SECURITY_LOGS;
use crate::error::StoreError;
use crate::store::KeyValueStore;

pub struct SecurityLogRepo;

impl SecurityLogRepo {
    /// Events oldest first.
    pub async fn load_all(store: &dyn KeyValueStore) -> Vec<SecurityEvent> {
        load_or_default(store, SECURITY_LOGS).await
    }

    /// Append one event, dropping the oldest beyond the cap.
    ///
    /// An unreadable log is started afresh rather than blocking the append.
    pub async fn append(store: &dyn KeyValueStore, event: SecurityEvent) -> Result<(), StoreError> {
        let mut events = Self::load_all(store).await;
        events.push(event);
        cap_events(&mut events);
        save(store, SECURITY_LOGS, &events).await
    }

    pub async fn clear(store: &dyn KeyValueStore) -> Result<(), StoreError> {
        save(store, SECURITY_LOGS, &Vec::<SecurityEvent>::new()).await
    }
}
