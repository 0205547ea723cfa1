//! Student accounts, ban records, and the validated request types used to
//! create and edit them.

use rand::distr::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::booking::validate_phone;
use crate::error::CoreError;
use crate::types::{Date, StudentId, Timestamp};

/// Entity name used in not-found errors.
pub const STUDENT_ENTITY: &str = "Student";

/// Length of passwords generated for new accounts.
pub const GENERATED_PASSWORD_LENGTH: usize = 8;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudentStatus {
    #[default]
    Active,
    Banned,
}

/// One entry of a student's ban history. Never removed, even on unban.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanRecord {
    pub date: Timestamp,
    pub reason: String,
    pub duration: String,
    #[serde(rename = "admin")]
    pub administrator: String,
}

/// A registered student.
///
/// The id is the key of the persisted students map, so it is not part of
/// the serialized record; repositories fill it in on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(skip)]
    pub id: StudentId,
    pub name: String,
    pub program: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    pub email: String,
    pub phone: String,
    pub registered_date: Date,
    #[serde(default)]
    pub status: StudentStatus,
    #[serde(default)]
    pub ban_history: Vec<BanRecord>,
}

impl Student {
    pub fn is_banned(&self) -> bool {
        self.status == StudentStatus::Banned
    }

    /// Shallow merge: every provided field replaces the stored one.
    pub fn apply_update(&mut self, update: &UpdateStudent) {
        if let Some(name) = &update.name {
            self.name = name.trim().to_string();
        }
        if let Some(program) = &update.program {
            self.program = program.trim().to_string();
        }
        if let Some(email) = &update.email {
            self.email = email.trim().to_string();
        }
        if let Some(phone) = &update.phone {
            self.phone = phone.trim().to_string();
        }
    }

    /// Record a ban and mark the account banned.
    pub fn ban(&mut self, record: BanRecord) {
        self.ban_history.push(record);
        self.status = StudentStatus::Banned;
    }

    /// Reactivate the account. The ban history is kept for audit.
    pub fn unban(&mut self) {
        self.status = StudentStatus::Active;
    }
}

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

/// Registration request. A password is generated when none is given.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateStudent {
    #[validate(length(min = 1, message = "Student ID is required"))]
    pub id: StudentId,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub program: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    pub phone: String,
    pub password: Option<String>,
}

impl CreateStudent {
    /// Field validation plus the phone format check.
    pub fn validate_request(&self) -> Result<(), CoreError> {
        self.validate()?;
        validate_phone(&self.phone).map_err(CoreError::Validation)
    }
}

/// Edit request. Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateStudent {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    pub program: Option<String>,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl UpdateStudent {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.program.is_none() && self.email.is_none() && self.phone.is_none()
    }

    /// Field validation plus the phone format check for a provided phone.
    pub fn validate_request(&self) -> Result<(), CoreError> {
        self.validate()?;
        match &self.phone {
            Some(phone) => validate_phone(phone).map_err(CoreError::Validation),
            None => Ok(()),
        }
    }
}

/// Random alphanumeric password for a new account.
pub fn generate_password<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..GENERATED_PASSWORD_LENGTH)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn student() -> Student {
        Student {
            id: "TIC001".to_string(),
            name: "Manish Karki".to_string(),
            program: "BSc. CSIT".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            email: "manish@example.edu".to_string(),
            phone: "9801234567".to_string(),
            registered_date: "2024-01-15".parse().unwrap(),
            status: StudentStatus::Active,
            ban_history: Vec::new(),
        }
    }

    fn create(id: &str, email: &str, phone: &str) -> CreateStudent {
        CreateStudent {
            id: id.to_string(),
            name: "New Student".to_string(),
            program: "BCA".to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            password: None,
        }
    }

    #[test]
    fn generated_password_is_alphanumeric() {
        let mut rng = StdRng::seed_from_u64(9);
        let password = generate_password(&mut rng);
        assert_eq!(password.len(), GENERATED_PASSWORD_LENGTH);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn ban_appends_history_and_unban_keeps_it() {
        let mut s = student();
        s.ban(BanRecord {
            date: Utc.with_ymd_and_hms(2025, 1, 9, 10, 0, 0).unwrap(),
            reason: "noise complaint".to_string(),
            duration: "1 week".to_string(),
            administrator: "texas".to_string(),
        });
        assert!(s.is_banned());
        assert_eq!(s.ban_history.len(), 1);

        s.unban();
        assert!(!s.is_banned());
        assert_eq!(s.ban_history.len(), 1);
        assert_eq!(s.ban_history[0].reason, "noise complaint");
    }

    #[test]
    fn update_merges_only_provided_fields() {
        let mut s = student();
        s.apply_update(&UpdateStudent {
            name: Some("  Manish K.  ".to_string()),
            phone: Some("9811111111".to_string()),
            ..UpdateStudent::default()
        });
        assert_eq!(s.name, "Manish K.");
        assert_eq!(s.phone, "9811111111");
        assert_eq!(s.program, "BSc. CSIT");
        assert_eq!(s.email, "manish@example.edu");
    }

    #[test]
    fn create_request_validation() {
        assert!(create("TIC010", "a@b.edu", "9800000000").validate_request().is_ok());
        assert!(create("", "a@b.edu", "9800000000").validate_request().is_err());
        assert!(create("TIC010", "not-an-email", "9800000000").validate_request().is_err());
        assert!(create("TIC010", "a@b.edu", "abc").validate_request().is_err());
    }

    #[test]
    fn update_request_validation_skips_absent_fields() {
        assert!(UpdateStudent::default().validate_request().is_ok());
        let bad_name = UpdateStudent {
            name: Some(String::new()),
            ..UpdateStudent::default()
        };
        assert!(bad_name.validate_request().is_err());
        let bad_phone = UpdateStudent {
            phone: Some("0000".to_string()),
            ..UpdateStudent::default()
        };
        assert!(bad_phone.validate_request().is_err());
    }

    #[test]
    fn validation_errors_become_core_validation() {
        let err = create("TIC010", "nope", "9800000000")
            .validate_request()
            .unwrap_err();
        match err {
            CoreError::Validation(msg) => assert!(msg.contains("valid email"), "got {msg}"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn record_omits_id_and_uses_original_keys() {
        let mut s = student();
        s.ban(BanRecord {
            date: Utc.with_ymd_and_hms(2025, 1, 9, 10, 0, 0).unwrap(),
            reason: "late".to_string(),
            duration: "2 days".to_string(),
            administrator: "texas".to_string(),
        });
        let json = serde_json::to_value(&s).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["registeredDate"], "2024-01-15");
        assert_eq!(json["status"], "banned");
        assert_eq!(json["banHistory"][0]["admin"], "texas");
    }
}
