//! Security event records kept in the capped `security_logs` collection.

use serde::{Deserialize, Serialize};

use crate::notice::Notice;
use crate::types::Timestamp;

/// Only the most recent events are kept.
pub const MAX_SECURITY_EVENTS: usize = 100;

/// Number of events shown as admin alerts.
pub const ALERT_LIMIT: usize = 10;

/// Recorded as the user when nobody is logged in.
pub const ANONYMOUS_USER: &str = "anonymous";

/// Known event names.
pub mod events {
    pub const STUDENT_LOGIN: &str = "student_login";
    pub const STUDENT_LOGIN_FAILED: &str = "student_login_failed";
    pub const STUDENT_LOGIN_BANNED: &str = "student_login_banned";
    pub const ADMIN_LOGIN_ATTEMPT: &str = "admin_login_attempt";
    pub const ADMIN_LOGIN: &str = "admin_login";
    pub const ADMIN_LOGIN_FAILED: &str = "admin_login_failed";
    pub const ADMIN_PASSWORD_ROTATED: &str = "admin_password_rotated";
    pub const LOGOUT: &str = "logout";
    pub const STUDENT_BANNED: &str = "student_banned";
    pub const STUDENT_UNBANNED: &str = "student_unbanned";
    pub const STUDENT_PASSWORD_CHANGED: &str = "student_password_changed";
    pub const DATA_EXPORTED: &str = "data_exported";
    pub const DATA_CLEARED: &str = "data_cleared";
}

/// One log entry. `details` is free-form: a message string or an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityEvent {
    pub timestamp: Timestamp,
    pub event: String,
    pub details: serde_json::Value,
    pub user: String,
}

impl SecurityEvent {
    /// The event as an admin alert: failures and attempts warn, successful
    /// logins succeed, everything else informs.
    pub fn alert(&self) -> Notice {
        let message = match &self.details {
            serde_json::Value::String(text) => format!("{} ({}): {text}", self.event, self.user),
            serde_json::Value::Null => format!("{} ({})", self.event, self.user),
            other => format!("{} ({}): {other}", self.event, self.user),
        };
        let event = self.event.as_str();
        if event.contains("failed") || event.contains("attempt") || event.contains("banned") {
            Notice::warning(message)
        } else if event == events::STUDENT_LOGIN || event == events::ADMIN_LOGIN {
            Notice::success(message)
        } else {
            Notice::info(message)
        }
    }
}

/// The most recent `limit` events, newest first.
pub fn recent_alerts(events: &[SecurityEvent], limit: usize) -> Vec<Notice> {
    events.iter().rev().take(limit).map(SecurityEvent::alert).collect()
}

/// Drop the oldest events so at most [`MAX_SECURITY_EVENTS`] remain.
pub fn cap_events(events: &mut Vec<SecurityEvent>) {
    if events.len() > MAX_SECURITY_EVENTS {
        let excess = events.len() - MAX_SECURITY_EVENTS;
        events.drain(..excess);
    }
}
