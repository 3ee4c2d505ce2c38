/**
 * Group Handlers
 *
 * # Routes
 *
 * - `GET    /api/group`                        - list with members
 * - `POST   /api/group`                        - create (201)
 * - `GET    /api/group/{id}`                   - fetch
 * - `PUT    /api/group/{id}`                   - rename
 * - `DELETE /api/group/{id}`                   - delete (204)
 * - `PUT    /api/group/{id}/member/{user_id}`  - add member (204)
 * - `DELETE /api/group/{id}/member/{user_id}`  - remove member (204)
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::BackendError;
use crate::backend::groups::db::{self, Group};
use crate::backend::realtime::Notifier;
use crate::backend::server::config::DbPool;
use crate::shared::error::validate_name;
use crate::shared::ResourceKind;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GroupRequest {
    pub name: String,
}

/// Group with its member ids
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupView {
    pub id: i64,
    pub name: String,
    pub members: Vec<i64>,
}

async fn view(pool: &DbPool, group: Group) -> Result<GroupView, BackendError> {
    let members = db::list_members(pool, group.id).await?;
    Ok(GroupView {
        id: group.id,
        name: group.name,
        members,
    })
}

async fn load(pool: &DbPool, id: i64) -> Result<Group, BackendError> {
    db::get_group(pool, id)
        .await?
        .ok_or_else(|| BackendError::not_found("Group", id))
}

pub async fn list_groups(State(pool): State<DbPool>) -> Result<Json<Vec<GroupView>>, BackendError> {
    let groups = db::list_groups(&pool).await?;
    let mut views = Vec::with_capacity(groups.len());
    for group in groups {
        views.push(view(&pool, group).await?);
    }
    Ok(Json(views))
}

pub async fn get_group(
    State(pool): State<DbPool>,
    Path(id): Path<i64>,
) -> Result<Json<GroupView>, BackendError> {
    let group = load(&pool, id).await?;
    Ok(Json(view(&pool, group).await?))
}

pub async fn create_group(
    State(pool): State<DbPool>,
    State(notifier): State<Notifier>,
    Json(request): Json<GroupRequest>,
) -> Result<(StatusCode, Json<GroupView>), BackendError> {
    validate_name("name", &request.name)?;

    let group = db::create_group(&pool, &request.name).await?;
    tracing::info!("[Groups] Created group {} ({})", group.id, group.name);
    notifier.notify_resource(ResourceKind::Groups).await;

    Ok((StatusCode::CREATED, Json(view(&pool, group).await?)))
}

pub async fn update_group(
    State(pool): State<DbPool>,
    State(notifier): State<Notifier>,
    Path(id): Path<i64>,
    Json(request): Json<GroupRequest>,
) -> Result<Json<GroupView>, BackendError> {
    validate_name("name", &request.name)?;

    let group = db::rename_group(&pool, id, &request.name)
        .await?
        .ok_or_else(|| BackendError::not_found("Group", id))?;
    notifier.notify_resource(ResourceKind::Groups).await;

    Ok(Json(view(&pool, group).await?))
}

pub async fn delete_group(
    State(pool): State<DbPool>,
    State(notifier): State<Notifier>,
    Path(id): Path<i64>,
) -> Result<StatusCode, BackendError> {
    if !db::delete_group(&pool, id).await? {
        return Err(BackendError::not_found("Group", id));
    }
    tracing::info!("[Groups] Deleted group {}", id);
    notifier.notify_resource(ResourceKind::Groups).await;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_member(
    State(pool): State<DbPool>,
    State(notifier): State<Notifier>,
    Path((id, user_id)): Path<(i64, i64)>,
) -> Result<StatusCode, BackendError> {
    load(&pool, id).await?;
    if get_user_by_id(&pool, user_id).await?.is_none() {
        return Err(BackendError::not_found("User", user_id));
    }

    if db::add_member(&pool, id, user_id).await? {
        notifier.notify_resource(ResourceKind::GroupMembers).await;
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove_member(
    State(pool): State<DbPool>,
    State(notifier): State<Notifier>,
    Path((id, user_id)): Path<(i64, i64)>,
) -> Result<StatusCode, BackendError> {
    load(&pool, id).await?;

    if !db::remove_member(&pool, id, user_id).await? {
        return Err(BackendError::not_found("Membership", format!("{id}/{user_id}")));
    }
    notifier.notify_resource(ResourceKind::GroupMembers).await;
    Ok(StatusCode::NO_CONTENT)
}
