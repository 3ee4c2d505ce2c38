/**
 * Authority Handlers
 *
 * - `GET    /api/authority`
 * - `PUT    /api/user/{id}/authority/{authority_id}`
 * - `DELETE /api/user/{id}/authority/{authority_id}`
 * - `PUT    /api/group/{id}/authority/{authority_id}`
 * - `DELETE /api/group/{id}/authority/{authority_id}`
 *
 * Grants are idempotent. Revoking a grant that does not exist is a 404.
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use crate::backend::auth::authorities::{self, Authority};
use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::BackendError;
use crate::backend::groups::db::get_group;
use crate::backend::realtime::Notifier;
use crate::backend::server::config::DbPool;
use crate::shared::ResourceKind;

pub async fn list_authorities(
    State(pool): State<DbPool>,
) -> Result<Json<Vec<Authority>>, BackendError> {
    Ok(Json(authorities::list_authorities(&pool).await?))
}

pub async fn grant_user_authority(
    State(pool): State<DbPool>,
    State(notifier): State<Notifier>,
    Path((id, authority_id)): Path<(i64, i64)>,
) -> Result<StatusCode, BackendError> {
    if get_user_by_id(&pool, id).await?.is_none() {
        return Err(BackendError::not_found("User", id));
    }
    // unknown authority ids surface as a foreign key violation (404)
    authorities::grant_user_authority(&pool, id, authority_id).await?;
    tracing::info!("[Auth] Granted authority {} to user {}", authority_id, id);
    notifier.notify_resource(ResourceKind::Users).await;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn revoke_user_authority(
    State(pool): State<DbPool>,
    State(notifier): State<Notifier>,
    Path((id, authority_id)): Path<(i64, i64)>,
) -> Result<StatusCode, BackendError> {
    if !authorities::revoke_user_authority(&pool, id, authority_id).await? {
        return Err(BackendError::not_found("Grant", format!("{id}/{authority_id}")));
    }
    tracing::info!("[Auth] Revoked authority {} from user {}", authority_id, id);
    notifier.notify_resource(ResourceKind::Users).await;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn grant_group_authority(
    State(pool): State<DbPool>,
    State(notifier): State<Notifier>,
    Path((id, authority_id)): Path<(i64, i64)>,
) -> Result<StatusCode, BackendError> {
    if get_group(&pool, id).await?.is_none() {
        return Err(BackendError::not_found("Group", id));
    }
    authorities::grant_group_authority(&pool, id, authority_id).await?;
    tracing::info!("[Auth] Granted authority {} to group {}", authority_id, id);
    notifier.notify_resource(ResourceKind::Groups).await;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn revoke_group_authority(
    State(pool): State<DbPool>,
    State(notifier): State<Notifier>,
    Path((id, authority_id)): Path<(i64, i64)>,
) -> Result<StatusCode, BackendError> {
    if !authorities::revoke_group_authority(&pool, id, authority_id).await? {
        return Err(BackendError::not_found("Grant", format!("{id}/{authority_id}")));
    }
    tracing::info!("[Auth] Revoked authority {} from group {}", authority_id, id);
    notifier.notify_resource(ResourceKind::Groups).await;
    Ok(StatusCode::NO_CONTENT)
}
