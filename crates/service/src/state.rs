use std::sync::Arc;

use futsal_core::security_event::events;
use futsal_db::{seed, KeyValueStore, SqliteStore};
use serde_json::json;

use crate::accounts::AccountManager;
use crate::allocator::BookingAllocator;
use crate::config::ServiceConfig;
use crate::dashboard::AdminDashboard;
use crate::desk::BookingDesk;
use crate::error::ServiceResult;
use crate::security_log::SecurityLog;
use crate::session::SessionManager;

/// Every service component, wired to one store.
///
/// Cheaply cloneable; all components are behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub store: Arc<dyn KeyValueStore>,
    pub security: SecurityLog,
    pub accounts: Arc<AccountManager>,
    pub sessions: Arc<SessionManager>,
    pub allocator: Arc<BookingAllocator>,
    pub desk: Arc<BookingDesk>,
    pub dashboard: Arc<AdminDashboard>,
}

impl AppState {
    /// Connect to the configured SQLite database, migrate, and bootstrap.
    pub async fn open(config: ServiceConfig) -> ServiceResult<Self> {
        let pool = futsal_db::create_pool(&config.database_url, config.db_max_connections).await?;
        tracing::info!("Database connection pool created");

        futsal_db::health_check(&pool).await?;
        futsal_db::run_migrations(&pool).await?;
        tracing::info!("Database migrations applied");

        Self::with_store(config, Arc::new(SqliteStore::new(pool))).await
    }

    /// Bootstrap on an existing store: create missing collections, seed the
    /// admin, load the booking ledger, and restore any persisted session.
    pub async fn with_store(config: ServiceConfig, store: Arc<dyn KeyValueStore>) -> ServiceResult<Self> {
        seed::ensure_collections(store.as_ref()).await?;

        let security = SecurityLog::new(Arc::clone(&store));
        let accounts = Arc::new(AccountManager::new(Arc::clone(&store), security.clone()));

        match &config.seed_admin_password {
            Some(password) => {
                accounts
                    .seed_admin(&config.seed_admin_username, password)
                    .await?;
            }
            None => tracing::debug!("SEED_ADMIN_PASSWORD not set, skipping admin seed"),
        }

        let allocator = Arc::new(BookingAllocator::load(Arc::clone(&store)).await?);
        let sessions = Arc::new(SessionManager::new(Arc::clone(&store), security.clone()));
        sessions.restore().await;

        let desk = Arc::new(BookingDesk::new(
            Arc::clone(&allocator),
            Arc::clone(&sessions),
            config.booking_horizon_days,
        ));
        let dashboard = Arc::new(AdminDashboard::new(
            Arc::clone(&store),
            Arc::clone(&allocator),
            security.clone(),
        ));

        Ok(Self {
            config: Arc::new(config),
            store,
            security,
            accounts,
            sessions,
            allocator,
            desk,
            dashboard,
        })
    }

    /// Wipe students and bookings, and reset the admins to the configured
    /// seed admin. Without a seed password the admin accounts are kept.
    ///
    /// Booking ids stay retired and the security log is kept. A logged-in
    /// student is logged out; an admin session survives.
    pub async fn clear_all_data(&self, administrator: &str) -> ServiceResult<()> {
        let bookings = self.allocator.clear().await?;
        let students = self.accounts.clear_students().await?;

        let admins_reset = match &self.config.seed_admin_password {
            Some(password) => {
                self.accounts
                    .reset_admins(&self.config.seed_admin_username, password)
                    .await?;
                true
            }
            None => false,
        };

        let student_session = self
            .sessions
            .current()
            .await
            .is_some_and(|session| !session.principal.is_admin());
        if student_session {
            self.sessions.logout().await?;
        }

        self.security
            .record(
                events::DATA_CLEARED,
                json!({ "students": students, "bookings": bookings, "adminsReset": admins_reset }),
                administrator,
            )
            .await;
        tracing::warn!(students, bookings, admins_reset, administrator, "All data cleared");
        Ok(())
    }
}
