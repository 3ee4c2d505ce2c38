/**
 * Authentication Handler Types
 *
 * Request and response bodies shared by the login and `me` handlers.
 */

use serde::{Deserialize, Serialize};

/// Login request
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    pub username: String,
    /// Plaintext, verified against the stored bcrypt hash
    pub password: String,
}

/// Auth response
///
/// Returned by login. Contains the JWT and the user it was issued for.
#[derive(Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// User as seen by the user themselves, including effective authorities
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub enabled: bool,
    pub authorities: Vec<String>,
}
