//! Authentication test helpers
//!
//! Creates users directly in the database and issues tokens for them, so
//! tests do not have to go through the login endpoint.

use yamba_management::backend::auth::authorities::authorities_for_user;
use yamba_management::backend::auth::sessions::create_token;
use yamba_management::backend::auth::users::{create_user, hash_password};
use yamba_management::backend::server::config::DbPool;
use yamba_management::shared::AppConfig;

/// Lowest cost bcrypt accepts, keeps the suite fast
pub const TEST_BCRYPT_COST: u32 = 4;

/// Test user credentials
pub struct TestUser {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub token: String,
}

/// Create a test user in the database and issue a token
pub async fn create_test_user(
    pool: &DbPool,
    config: &AppConfig,
    username: &str,
    password: &str,
) -> TestUser {
    let hash = hash_password(password, TEST_BCRYPT_COST).expect("Failed to hash password");
    let user = create_user(pool, username, &hash, true)
        .await
        .expect("Failed to create test user");
    let authorities = authorities_for_user(pool, user.id)
        .await
        .expect("Failed to load authorities");
    let token =
        create_token(config, user.id, &user.username, authorities).expect("Failed to create token");

    TestUser {
        id: user.id,
        username: user.username,
        password: password.to_string(),
        token,
    }
}

/// Create authorization header value
pub fn auth_header(token: &str) -> String {
    format!("Bearer {}", token)
}
