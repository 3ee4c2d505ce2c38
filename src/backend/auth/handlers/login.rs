/**
 * Login Handler
 *
 * `POST /api/auth/login`
 *
 * # Authentication Process
 *
 * 1. Look up user by username
 * 2. Reject disabled accounts
 * 3. Verify password using bcrypt
 * 4. Resolve effective authorities
 * 5. Return token and user info
 *
 * Unknown user, disabled account and wrong password all answer with the
 * same 401 body.
 */

use std::sync::Arc;

use axum::{extract::State, response::Json};
use bcrypt::verify;

use crate::backend::auth::authorities::authorities_for_user;
use crate::backend::auth::handlers::types::{AuthResponse, LoginRequest, UserResponse};
use crate::backend::auth::sessions::create_token;
use crate::backend::auth::users::get_user_by_username;
use crate::backend::error::BackendError;
use crate::backend::server::config::DbPool;
use crate::shared::AppConfig;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Login handler
///
/// # Example Request
///
/// ```http
/// POST /api/auth/login HTTP/1.1
/// Content-Type: application/json
///
/// {"username": "root", "password": "..."}
/// ```
///
/// # Example Response
///
/// ```json
/// {
///   "token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...",
///   "user": {"id": 0, "username": "root", "enabled": true, "authorities": ["ROLE_ADMIN"]}
/// }
/// ```
pub async fn login(
    State(pool): State<DbPool>,
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, BackendError> {
    tracing::info!("[Auth] Login request for: {}", request.username);

    let user = get_user_by_username(&pool, &request.username)
        .await?
        .ok_or_else(|| {
            tracing::warn!("[Auth] User not found: {}", request.username);
            BackendError::unauthorized(INVALID_CREDENTIALS)
        })?;

    if !user.enabled {
        tracing::warn!("[Auth] Login attempt for disabled user: {}", user.username);
        return Err(BackendError::unauthorized(INVALID_CREDENTIALS));
    }

    if !verify(&request.password, &user.password)? {
        tracing::warn!("[Auth] Invalid password for user: {}", request.username);
        return Err(BackendError::unauthorized(INVALID_CREDENTIALS));
    }

    let authorities = authorities_for_user(&pool, user.id).await?;
    let token = create_token(&config, user.id, &user.username, authorities.clone())?;

    tracing::info!("[Auth] User logged in: {} ({})", user.username, user.id);

    Ok(Json(AuthResponse {
        token,
        user: UserResponse {
            id: user.id,
            username: user.username,
            enabled: user.enabled,
            authorities,
        },
    }))
}
