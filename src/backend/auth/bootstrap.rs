/**
 * Root Account Bootstrap
 *
 * A fresh database has no users, so nobody could log in. On startup the
 * server creates `root` (id 0) with a random password, grants it
 * `ROLE_ADMIN` and prints the password once in the log. Later starts find
 * the account and leave it alone.
 */

use rand::{distributions::Alphanumeric, Rng};

use crate::backend::auth::authorities::ADMIN_AUTHORITY_ID;
use crate::backend::auth::users::{create_user_with_id, get_user_by_id, hash_password};
use crate::backend::error::BackendError;
use crate::backend::server::config::DbPool;

pub const ROOT_USER_ID: i64 = 0;
pub const ROOT_USERNAME: &str = "root";

const ROOT_PASSWORD_LENGTH: usize = 20;

/// Generate a random alphanumeric password
pub fn generate_password(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Create the root account if it does not exist yet
///
/// # Returns
///
/// The generated password when the account was created, `None` otherwise
pub async fn ensure_root_user(pool: &DbPool, bcrypt_cost: u32) -> Result<Option<String>, BackendError> {
    if get_user_by_id(pool, ROOT_USER_ID).await?.is_some() {
        tracing::debug!("[Auth] Root user already present");
        return Ok(None);
    }

    let password = generate_password(ROOT_PASSWORD_LENGTH);
    let hash = hash_password(&password, bcrypt_cost)?;

    create_user_with_id(pool, ROOT_USER_ID, ROOT_USERNAME, &hash, ADMIN_AUTHORITY_ID).await?;

    tracing::warn!(
        "[Auth] Created user '{}' with password: {}",
        ROOT_USERNAME,
        password
    );
    Ok(Some(password))
}
