//! Who is logged in.
//!
//! A [`Session`] is created by a successful login and discarded by logout.
//! It is persisted so that it survives a restart.

use serde::{Deserialize, Serialize};

use crate::types::{StudentId, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Principal {
    Student {
        student_id: StudentId,
        name: String,
        program: String,
        email: String,
        phone: String,
    },
    Admin {
        username: String,
        role: String,
    },
}

impl Principal {
    /// Identifier recorded in security events.
    pub fn user_label(&self) -> &str {
        match self {
            Principal::Student { student_id, .. } => student_id,
            Principal::Admin { username, .. } => username,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Principal::Admin { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub principal: Principal,
    pub started_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn principal_is_tagged_by_type() {
        let session = Session {
            principal: Principal::Admin {
                username: "texas".to_string(),
                role: "super_admin".to_string(),
            },
            started_at: Utc::now(),
        };
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["principal"]["type"], "admin");
        assert_eq!(json["principal"]["username"], "texas");

        let back: Session = serde_json::from_value(json).unwrap();
        assert_eq!(back, session);
        assert_eq!(back.principal.user_label(), "texas");
        assert!(back.principal.is_admin());
    }
}
