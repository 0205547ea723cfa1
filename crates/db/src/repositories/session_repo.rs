//! Repository for the persisted `futsal_session` entry.

use futsal_core::session::Session;

use super::save;
use crate::collections::SESSION;
use crate::error::StoreError;
use crate::store::KeyValueStore;

pub struct SessionRepo;

impl SessionRepo {
    /// The stored session, if one exists and can be decoded.
    pub async fn load(store: &dyn KeyValueStore) -> Option<Session> {
        let raw = match store.get(SESSION).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored session");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable stored session");
                None
            }
        }
    }

    pub async fn save(store: &dyn KeyValueStore, session: &Session) -> Result<(), StoreError> {
        save(store, SESSION, session).await
    }

    pub async fn clear(store: &dyn KeyValueStore) -> Result<(), StoreError> {
        store.remove(SESSION).await
    }
}
