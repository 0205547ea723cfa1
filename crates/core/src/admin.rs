//! Administrator accounts.

use serde::{Deserialize, Serialize};

/// Entity name used in not-found errors.
pub const ADMIN_ENTITY: &str = "Admin";

/// An administrator, keyed by username in the persisted admins map.
///
/// Admins are seeded at bootstrap; only credential rotation changes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub username: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    pub role: String,
}
