use futsal_core::error::CoreError;
use futsal_core::notice::Notice;
use futsal_db::StoreError;

/// Error type for every service operation.
///
/// Wraps [`CoreError`] for domain failures and adds the storage failures
/// the service layer can hit. [`ServiceError::notice`] turns any of them
/// into the single banner the user sees.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A domain-level error from `futsal_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failed write of a persisted collection.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// A persisted collection could not be read before a change.
    #[error("Failed to read stored data: {0}")]
    Load(StoreError),

    /// Opening the database failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Convenience alias for service return values.
pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// The user-facing banner for this error.
    pub fn notice(&self) -> Notice {
        match self {
            ServiceError::Core(core) => {
                if let CoreError::Internal(msg) = core {
                    tracing::error!(error = %msg, "Internal error");
                }
                Notice::from(core)
            }
            ServiceError::Store(err) => {
                tracing::error!(error = %err, "Storage failure");
                Notice::error("Could not save your changes. Please try again.")
            }
            ServiceError::Load(err) => {
                tracing::error!(error = %err, "Stored data unreadable");
                Notice::error("Could not load the stored data. Please try again later.")
            }
            ServiceError::Database(err) => {
                tracing::error!(error = %err, "Database failure");
                Notice::error("The booking store is unavailable. Please try again later.")
            }
            ServiceError::Migration(err) => {
                tracing::error!(error = %err, "Migration failure");
                Notice::error("The booking store is unavailable. Please try again later.")
            }
        }
    }

    /// The domain error, if this is one.
    pub fn as_core(&self) -> Option<&CoreError> {
        match self {
            ServiceError::Core(core) => Some(core),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use futsal_core::error::BookingConflict;
    use futsal_core::notice::Severity;

    use super::*;

    #[test]
    fn conflict_keeps_rule_message() {
        let err = ServiceError::from(CoreError::from(BookingConflict::StudentAlreadyBooked {
            student_id: "TIC001".to_string(),
            date: "2025-01-10".parse().unwrap(),
        }));
        let notice = err.notice();
        assert_eq!(notice.severity, Severity::Error);
        assert_eq!(notice.message, "You already have a booking on this date");
    }

    #[test]
    fn storage_failure_is_generic() {
        let err = ServiceError::from(StoreError::Unavailable("disk full".to_string()));
        let notice = err.notice();
        assert!(!notice.message.contains("disk"));
        assert!(err.as_core().is_none());
    }

    #[test]
    fn read_failure_is_not_reported_as_save() {
        let read = ServiceError::Load(StoreError::Unavailable("locked".to_string())).notice();
        let write = ServiceError::Store(StoreError::Unavailable("locked".to_string())).notice();
        assert_eq!(read.severity, Severity::Error);
        assert!(read.message.starts_with("Could not load"));
        assert_ne!(read.message, write.message);
    }
}
