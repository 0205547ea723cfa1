//! Well-known administrator role names.
//!
//! These must match the role stored on seeded admin records.

pub const ROLE_SUPER_ADMIN: &str = "super_admin";
pub const ROLE_ADMIN: &str = "admin";

/// The set of all valid administrator roles.
pub const VALID_ROLES: &[&str] = &[ROLE_SUPER_ADMIN, ROLE_ADMIN];

/// Returns `true` if the given role name is recognised.
pub fn is_valid_role(role: &str) -> bool {
    VALID_ROLES.contains(&role)
}
