/**
 * Session Management and JWT Tokens
 *
 * Session tokens are HS256 JWTs signed with the configured secret. They
 * carry the user id, username and the authorities resolved at login, so
 * clients can render role-dependent views without another round trip.
 * The middleware still re-checks that the user exists and is enabled on
 * every request.
 */

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::shared::AppConfig;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Username at the time the token was issued
    pub username: String,
    /// Granted authorities, direct and inherited from groups
    #[serde(default)]
    pub authorities: Vec<String>,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

impl Claims {
    /// Parse the subject back into a user id
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

/// Create a session token for a user
pub fn create_token(
    config: &AppConfig,
    user_id: i64,
    username: &str,
    authorities: Vec<String>,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp().max(0) as u64;
    let exp = now.saturating_add(config.token_ttl_hours.saturating_mul(60 * 60));

    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        authorities,
        exp,
        iat: now,
    };

    let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
    encode(&Header::default(), &claims, &key)
}

/// Verify and decode a session token
pub fn verify_token(config: &AppConfig, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
    let token_data = decode::<Claims>(token, &key, &Validation::default())?;
    Ok(token_data.claims)
}
