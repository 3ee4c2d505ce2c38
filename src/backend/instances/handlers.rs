/**
 * Instance Handlers
 *
 * CRUD for stored instances plus start/stop through the daemon. Every
 * response carries the computed `running` flag. Mutations notify the
 * instance listing topic.
 *
 * # Routes
 *
 * - `GET    /api/instance`            - list
 * - `POST   /api/instance`            - create (201)
 * - `GET    /api/instance/{id}`       - fetch
 * - `PUT    /api/instance/{id}`       - update
 * - `DELETE /api/instance/{id}`       - delete (204)
 * - `PUT    /api/instance/{id}/start` - start on the daemon
 * - `PUT    /api/instance/{id}/stop`  - stop on the daemon
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Serialize;

use crate::backend::error::BackendError;
use crate::backend::instances::daemon::DaemonService;
use crate::backend::instances::db::{self, Instance, InstanceRequest};
use crate::backend::realtime::Notifier;
use crate::backend::server::config::DbPool;
use crate::shared::ResourceKind;

/// Instance as returned to clients
#[derive(Debug, Clone, Serialize)]
pub struct InstanceView {
    #[serde(flatten)]
    pub instance: Instance,
    pub running: bool,
}

async fn view(daemon: &DaemonService, instance: Instance) -> InstanceView {
    let running = daemon.is_running(instance.id).await;
    InstanceView { instance, running }
}

async fn load(pool: &DbPool, id: i64) -> Result<Instance, BackendError> {
    db::get_instance(pool, id)
        .await?
        .ok_or_else(|| BackendError::not_found("Instance", id))
}

pub async fn list_instances(
    State(pool): State<DbPool>,
    State(daemon): State<DaemonService>,
) -> Result<Json<Vec<InstanceView>>, BackendError> {
    let instances = db::list_instances(&pool).await?;
    let mut views = Vec::with_capacity(instances.len());
    for instance in instances {
        views.push(view(&daemon, instance).await);
    }
    Ok(Json(views))
}

pub async fn get_instance(
    State(pool): State<DbPool>,
    State(daemon): State<DaemonService>,
    Path(id): Path<i64>,
) -> Result<Json<InstanceView>, BackendError> {
    let instance = load(&pool, id).await?;
    Ok(Json(view(&daemon, instance).await))
}

pub async fn create_instance(
    State(pool): State<DbPool>,
    State(daemon): State<DaemonService>,
    State(notifier): State<Notifier>,
    Json(request): Json<InstanceRequest>,
) -> Result<(StatusCode, Json<InstanceView>), BackendError> {
    request.validate()?;

    let instance = db::create_instance(&pool, &request).await?;
    tracing::info!("[Instances] Created instance {} ({})", instance.id, instance.name);
    notifier.notify_resource(ResourceKind::Instances).await;

    Ok((StatusCode::CREATED, Json(view(&daemon, instance).await)))
}

pub async fn update_instance(
    State(pool): State<DbPool>,
    State(daemon): State<DaemonService>,
    State(notifier): State<Notifier>,
    Path(id): Path<i64>,
    Json(request): Json<InstanceRequest>,
) -> Result<Json<InstanceView>, BackendError> {
    request.validate()?;

    let instance = db::update_instance(&pool, id, &request)
        .await?
        .ok_or_else(|| BackendError::not_found("Instance", id))?;
    notifier.notify_resource(ResourceKind::Instances).await;

    Ok(Json(view(&daemon, instance).await))
}

pub async fn delete_instance(
    State(pool): State<DbPool>,
    State(daemon): State<DaemonService>,
    State(notifier): State<Notifier>,
    Path(id): Path<i64>,
) -> Result<StatusCode, BackendError> {
    let instance = load(&pool, id).await?;

    if let Err(e) = daemon.stop_instance(instance.id).await {
        tracing::warn!("[Instances] Could not stop instance {} before delete: {}", id, e);
    }

    db::delete_instance(&pool, id).await?;
    tracing::info!("[Instances] Deleted instance {}", id);
    notifier.notify_resource(ResourceKind::Instances).await;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn start_instance(
    State(pool): State<DbPool>,
    State(daemon): State<DaemonService>,
    State(notifier): State<Notifier>,
    Path(id): Path<i64>,
) -> Result<Json<InstanceView>, BackendError> {
    let instance = load(&pool, id).await?;

    if daemon.start_instance(&instance).await? {
        notifier.notify_resource(ResourceKind::InstanceState).await;
    }

    Ok(Json(view(&daemon, instance).await))
}

pub async fn stop_instance(
    State(pool): State<DbPool>,
    State(daemon): State<DaemonService>,
    State(notifier): State<Notifier>,
    Path(id): Path<i64>,
) -> Result<Json<InstanceView>, BackendError> {
    let instance = load(&pool, id).await?;

    if daemon.stop_instance(instance.id).await? {
        notifier.notify_resource(ResourceKind::InstanceState).await;
    }

    Ok(Json(view(&daemon, instance).await))
}

/// Start every instance flagged `autostart`
///
/// Failures are logged and skipped.
///
/// # Returns
/// Number of instances started
pub async fn autostart_instances(pool: &DbPool, daemon: &DaemonService) -> Result<usize, BackendError> {
    let instances = db::list_autostart_instances(pool).await?;
    let mut started = 0;

    for instance in &instances {
        match daemon.start_instance(instance).await {
            Ok(true) => started += 1,
            Ok(false) => {}
            Err(e) => {
                tracing::warn!("[Instances] Autostart of {} failed: {}", instance.id, e);
            }
        }
    }

    tracing::info!("[Instances] Autostarted {}/{} instances", started, instances.len());
    Ok(started)
}
