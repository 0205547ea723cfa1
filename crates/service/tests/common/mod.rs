#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futsal_core::booking::CreateBooking;
use futsal_core::student::CreateStudent;
use futsal_core::types::Date;
use futsal_db::{KeyValueStore, MemoryStore, StoreError};
use futsal_service::accounts::Registration;
use futsal_service::config::ServiceConfig;
use futsal_service::desk::BookingForm;
use futsal_service::state::AppState;

pub const ADMIN_USERNAME: &str = "texas";
pub const ADMIN_PASSWORD: &str = "admin-secret-1";
pub const STUDENT_PASSWORD: &str = "student123";

/// Build a test `ServiceConfig` with a seeded admin and the default window.
pub fn test_config() -> ServiceConfig {
    ServiceConfig {
        database_url: "sqlite::memory:".to_string(),
        db_max_connections: 1,
        seed_admin_username: ADMIN_USERNAME.to_string(),
        seed_admin_password: Some(ADMIN_PASSWORD.to_string()),
        booking_horizon_days: 5,
    }
}

/// The fixed "today" used by date-sensitive tests.
pub fn today() -> Date {
    "2025-01-08".parse().unwrap()
}

pub fn date(s: &str) -> Date {
    s.parse().unwrap()
}

/// Bootstrap the full service over `store`.
pub async fn build_state(store: Arc<dyn KeyValueStore>) -> AppState {
    AppState::with_store(test_config(), store).await.unwrap()
}

pub async fn memory_state() -> AppState {
    build_state(Arc::new(MemoryStore::new())).await
}

pub async fn register(state: &AppState, id: &str) -> Registration {
    state
        .accounts
        .register(
            CreateStudent {
                id: id.to_string(),
                name: format!("Student {id}"),
                program: "BCA".to_string(),
                email: format!("{}@example.edu", id.to_lowercase()),
                phone: "9800000000".to_string(),
                password: Some(STUDENT_PASSWORD.to_string()),
            },
            today(),
        )
        .await
        .unwrap()
}

pub fn request(student_id: &str, day: &str, time: &str) -> CreateBooking {
    CreateBooking {
        student_id: student_id.to_string(),
        student_name: format!("Student {student_id}"),
        date: date(day),
        time: time.parse().unwrap(),
        team_name: "TeamA".to_string(),
        phone: "9800000000".to_string(),
    }
}

pub fn form(day: &str, time: &str) -> BookingForm {
    BookingForm {
        date: day.to_string(),
        time: time.to_string(),
        team_name: "TeamA".to_string(),
        phone: "9800000000".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Failing store
// ---------------------------------------------------------------------------

/// A memory store whose writes can be switched off.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    fail_writes: AtomicBool,
}

impl FlakyStore {
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("writes disabled".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check()?;
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.check()?;
        self.inner.remove(key).await
    }
}
