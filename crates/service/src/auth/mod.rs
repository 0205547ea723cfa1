//! Credential handling shared by the account and session managers.

pub mod password;

use futsal_core::admin::Admin;
use futsal_db::repositories::AdminRepo;
use futsal_db::KeyValueStore;

use crate::error::ServiceResult;
use password::verify_password;

/// Look up an admin and check the password.
///
/// Returns `None` for an unknown username or a wrong password.
pub async fn authenticate_admin(
    store: &dyn KeyValueStore,
    username: &str,
    password: &str,
) -> ServiceResult<Option<Admin>> {
    let Some(admin) = AdminRepo::find_by_username(store, username).await else {
        return Ok(None);
    };
    if verify_password(password, &admin.password_hash)? {
        Ok(Some(admin))
    } else {
        Ok(None)
    }
}
