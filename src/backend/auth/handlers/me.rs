/**
 * Get Current User Handler
 *
 * `GET /api/auth/me` returns the authenticated caller with freshly
 * resolved authorities, so changes made after login show up here before
 * the token is renewed.
 */

use axum::{extract::State, response::Json};

use crate::backend::auth::authorities::authorities_for_user;
use crate::backend::auth::handlers::types::UserResponse;
use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::server::config::DbPool;

pub async fn get_me(
    State(pool): State<DbPool>,
    AuthUser(caller): AuthUser,
) -> Result<Json<UserResponse>, BackendError> {
    let user = get_user_by_id(&pool, caller.user_id)
        .await?
        .ok_or_else(|| BackendError::not_found("User", caller.user_id))?;
    let authorities = authorities_for_user(&pool, user.id).await?;

    Ok(Json(UserResponse {
        id: user.id,
        username: user.username,
        enabled: user.enabled,
        authorities,
    }))
}
