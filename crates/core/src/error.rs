use crate::slots::TimeSlot;
use crate::types::{Date, StudentId};

/// Reason a reservation request was refused.
///
/// The slot check always runs first, so a request that violates both rules
/// is reported as [`BookingConflict::SlotTaken`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingConflict {
    #[error("This time slot is already booked by another student")]
    SlotTaken { date: Date, time: TimeSlot },

    #[error("You already have a booking on this date")]
    StudentAlreadyBooked { student_id: StudentId, date: Date },
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(#[from] BookingConflict),

    #[error("{entity} {id} already exists")]
    AlreadyExists { entity: &'static str, id: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{field} is invalid"),
                })
            })
            .collect();
        messages.sort();
        Self::Validation(messages.join("; "))
    }
}
