//! Append-only security event log.

use std::sync::Arc;

use chrono::Utc;
use futsal_core::security_event::SecurityEvent;
use futsal_db::repositories::SecurityLogRepo;
use futsal_db::KeyValueStore;
use tokio::sync::Mutex;

use crate::error::ServiceResult;

/// Records security events into the capped `security_logs` collection.
///
/// Clones share one write lock, so concurrent appends never drop events.
#[derive(Clone)]
pub struct SecurityLog {
    store: Arc<dyn KeyValueStore>,
    write_lock: Arc<Mutex<()>>,
}

impl SecurityLog {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Append one event. A failed write is logged and otherwise ignored.
    pub async fn record(&self, event: &str, details: impl Into<serde_json::Value>, user: &str) {
        let entry = SecurityEvent {
            timestamp: Utc::now(),
            event: event.to_string(),
            details: details.into(),
            user: user.to_string(),
        };

        let _guard = self.write_lock.lock().await;
        match SecurityLogRepo::append(self.store.as_ref(), entry).await {
            Ok(()) => tracing::debug!(event, user, "Security event recorded"),
            Err(e) => tracing::warn!(event, user, error = %e, "Failed to record security event"),
        }
    }

    /// Events oldest first.
    pub async fn entries(&self) -> Vec<SecurityEvent> {
        SecurityLogRepo::load_all(self.store.as_ref()).await
    }

    pub async fn clear(&self) -> ServiceResult<()> {
        let _guard = self.write_lock.lock().await;
        SecurityLogRepo::clear(self.store.as_ref()).await?;
        tracing::info!("Security log cleared");
        Ok(())
    }
}
