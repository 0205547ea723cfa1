//! Admin views and exports.

use std::sync::Arc;

use futsal_core::booking::{self, Booking};
use futsal_core::notice::Notice;
use futsal_core::security_event::{events, recent_alerts};
use futsal_core::statistics::Statistics;
use futsal_core::types::Date;
use futsal_db::repositories::{SecurityLogRepo, StudentRepo};
use futsal_db::{KeyValueStore, StoreError};
use serde_json::json;

use crate::allocator::BookingAllocator;
use crate::error::{ServiceError, ServiceResult};
use crate::export::{Export, ExportKind};
use crate::security_log::SecurityLog;

pub struct AdminDashboard {
    store: Arc<dyn KeyValueStore>,
    allocator: Arc<BookingAllocator>,
    security: SecurityLog,
}

impl AdminDashboard {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        allocator: Arc<BookingAllocator>,
        security: SecurityLog,
    ) -> Self {
        Self {
            store,
            allocator,
            security,
        }
    }

    pub async fn statistics(&self, today: Date) -> Statistics {
        let students = StudentRepo::load_all(self.store.as_ref()).await;
        let bookings = self.allocator.list_bookings().await;
        let stats = Statistics::compute(students.values(), &bookings, today);
        tracing::debug!(?stats, "Computed statistics");
        stats
    }

    /// Confirmed bookings dated `today`.
    pub async fn todays_bookings(&self, today: Date) -> Vec<Booking> {
        let bookings = self.allocator.list_bookings().await;
        booking::todays_bookings(&bookings, today)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Confirmed bookings after `today`, soonest first.
    pub async fn upcoming_bookings(&self, today: Date) -> Vec<Booking> {
        let bookings = self.allocator.list_bookings().await;
        booking::upcoming_bookings(&bookings, today)
            .into_iter()
            .cloned()
            .collect()
    }

    /// The most recently made bookings, newest first.
    pub async fn recent_activity(&self, limit: usize) -> Vec<Booking> {
        let bookings = self.allocator.list_bookings().await;
        booking::recent_activity(&bookings, limit)
            .into_iter()
            .cloned()
            .collect()
    }

    /// The latest security events as alerts, newest first.
    pub async fn security_alerts(&self, limit: usize) -> Vec<Notice> {
        recent_alerts(&self.security.entries().await, limit)
    }

    /// Render one collection as pretty-printed JSON.
    ///
    /// Students are read strictly so an unreadable collection is reported
    /// instead of being exported as empty.
    pub async fn export(
        &self,
        kind: ExportKind,
        today: Date,
        administrator: &str,
    ) -> ServiceResult<Export> {
        let rendered = match kind {
            ExportKind::Students => {
                let students = StudentRepo::fetch_all(self.store.as_ref())
                    .await
                    .map_err(ServiceError::Load)?;
                Export::render(kind, today, students.len(), &students)
            }
            ExportKind::Bookings => {
                let bookings = self.allocator.list_bookings().await;
                Export::render(kind, today, bookings.len(), &bookings)
            }
            ExportKind::SecurityLogs => {
                let logs = SecurityLogRepo::load_all(self.store.as_ref()).await;
                Export::render(kind, today, logs.len(), &logs)
            }
        };
        let export = rendered.map_err(StoreError::from)?;

        if !export.is_empty() {
            self.security
                .record(
                    events::DATA_EXPORTED,
                    json!({ "file": export.file_name, "records": export.record_count }),
                    administrator,
                )
                .await;
        }
        tracing::info!(file = %export.file_name, records = export.record_count, "Exported collection");
        Ok(export)
    }
}
