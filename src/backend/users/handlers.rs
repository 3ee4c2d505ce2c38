/**
 * User Handlers
 *
 * Account administration. Passwords arrive in plaintext, are validated,
 * hashed with the configured bcrypt cost and never returned.
 *
 * # Routes
 *
 * - `GET    /api/user`       - list
 * - `POST   /api/user`       - create (201, 409 on duplicate username)
 * - `GET    /api/user/{id}`  - fetch
 * - `PUT    /api/user/{id}`  - update
 * - `DELETE /api/user/{id}`  - delete (204)
 */

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::backend::auth::users::{self, hash_password, User, UserChanges};
use crate::backend::error::BackendError;
use crate::backend::realtime::Notifier;
use crate::backend::server::config::DbPool;
use crate::shared::error::{validate_password, validate_username};
use crate::shared::{AppConfig, ResourceKind};

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

/// Partial update; absent fields stay unchanged
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub password: Option<String>,
}

pub async fn list_users(State(pool): State<DbPool>) -> Result<Json<Vec<User>>, BackendError> {
    Ok(Json(users::list_users(&pool).await?))
}

pub async fn get_user(
    State(pool): State<DbPool>,
    Path(id): Path<i64>,
) -> Result<Json<User>, BackendError> {
    users::get_user_by_id(&pool, id)
        .await?
        .map(Json)
        .ok_or_else(|| BackendError::not_found("User", id))
}

pub async fn create_user(
    State(pool): State<DbPool>,
    State(config): State<Arc<AppConfig>>,
    State(notifier): State<Notifier>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), BackendError> {
    validate_username(&request.username)?;
    validate_password(&request.password)?;

    if users::get_user_by_username(&pool, &request.username).await?.is_some() {
        tracing::warn!("[Users] Username already taken: {}", request.username);
        return Err(BackendError::conflict(format!(
            "Username '{}' is already taken",
            request.username
        )));
    }

    let hash = hash_password(&request.password, config.bcrypt_cost)?;
    let user = users::create_user(&pool, &request.username, &hash, request.enabled).await?;
    tracing::info!("[Users] Created user {} ({})", user.id, user.username);
    notifier.notify_resource(ResourceKind::Users).await;

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update_user(
    State(pool): State<DbPool>,
    State(config): State<Arc<AppConfig>>,
    State(notifier): State<Notifier>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<User>, BackendError> {
    if let Some(username) = &request.username {
        validate_username(username)?;
    }
    let password_hash = match &request.password {
        Some(password) => {
            validate_password(password)?;
            Some(hash_password(password, config.bcrypt_cost)?)
        }
        None => None,
    };

    let changes = UserChanges {
        username: request.username,
        enabled: request.enabled,
        password_hash,
    };
    let user = users::update_user(&pool, id, changes)
        .await?
        .ok_or_else(|| BackendError::not_found("User", id))?;
    notifier.notify_resource(ResourceKind::Users).await;

    Ok(Json(user))
}

pub async fn delete_user(
    State(pool): State<DbPool>,
    State(notifier): State<Notifier>,
    Path(id): Path<i64>,
) -> Result<StatusCode, BackendError> {
    if !users::delete_user(&pool, id).await? {
        return Err(BackendError::not_found("User", id));
    }
    tracing::info!("[Users] Deleted user {}", id);
    notifier.notify_resource(ResourceKind::Users).await;
    Ok(StatusCode::NO_CONTENT)
}
