//! User-facing outcome banners.
//!
//! Every operation ends in exactly one [`Notice`]: a message and a severity.
//! Nothing is retried; the notice is all the user sees.

use serde::Serialize;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Info)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Success)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Warning)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Error)
    }

    fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }
}

impl From<&CoreError> for Notice {
    fn from(err: &CoreError) -> Self {
        match err {
            CoreError::NotFound { entity, .. } => Notice::error(format!("{entity} not found")),
            CoreError::Validation(msg) => Notice::error(msg.clone()),
            CoreError::Conflict(conflict) => Notice::error(conflict.to_string()),
            CoreError::AlreadyExists { entity, .. } => Notice::error(format!(
                "{entity} ID already exists. Please use a different ID."
            )),
            CoreError::Unauthorized(msg) => Notice::error(msg.clone()),
            CoreError::Forbidden(msg) => Notice::error(msg.clone()),
            CoreError::Internal(_) => Notice::error("Something went wrong. Please try again."),
        }
    }
}
