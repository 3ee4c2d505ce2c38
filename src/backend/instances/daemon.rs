/**
 * Daemon Control Client
 *
 * Starts and stops voice instances on the playback daemon over HTTP and
 * remembers which ones are running. The running map only changes after
 * the daemon acknowledged the request, so a failed call leaves the
 * recorded state as it was.
 *
 * Start and stop of the same instance are serialized by a per-instance
 * lock held from the running check until the map is updated, so
 * concurrent requests cannot both reach the daemon.
 *
 * # Daemon API
 *
 * - `POST {daemon}/instance/start` with an [`InstanceLoadReq`]
 * - `POST {daemon}/instance/stop` with `{"id": ..}`
 *
 * Errors come back as `{"details": .., "msg": ..}` with a non-2xx status.
 */

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

use crate::backend::instances::db::Instance;

/// Volume new instances start with
pub const DEFAULT_VOLUME: f64 = 0.05;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Failure talking to the daemon
#[derive(Error, Debug)]
pub enum DaemonError {
    #[error("Daemon unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Daemon returned {status}{}", detail_suffix(.message))]
    Status { status: u16, message: Option<String> },
}

fn detail_suffix(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}

/// Body of `/instance/start`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceLoadReq {
    pub id: i64,
    pub data: InstanceType,
    pub volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstanceType {
    TS(TSSettings),
}

/// Connection settings for a TeamSpeak instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TSSettings {
    pub host: String,
    pub port: Option<u16>,
    pub identity: String,
    pub cid: Option<i32>,
    pub name: String,
    pub password: Option<String>,
}

impl InstanceLoadReq {
    pub fn from_instance(instance: &Instance, volume: f64) -> Self {
        Self {
            id: instance.id,
            data: InstanceType::TS(TSSettings {
                host: instance.host.clone(),
                port: Some(instance.port),
                identity: instance.identity.clone().unwrap_or_default(),
                cid: instance.cid,
                name: instance.name.clone(),
                password: instance.password.clone(),
            }),
            volume,
        }
    }
}

#[derive(Debug, Serialize)]
struct GenericRequest {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    msg: Option<String>,
}

/// Client for the playback daemon plus the set of running instances
#[derive(Clone)]
pub struct DaemonService {
    client: reqwest::Client,
    base_url: String,
    running: Arc<RwLock<HashMap<i64, Instance>>>,
    control: Arc<Mutex<HashMap<i64, Arc<Mutex<()>>>>>,
}

impl DaemonService {
    pub fn new(base_url: impl Into<String>) -> Result<Self, DaemonError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            running: Arc::new(RwLock::new(HashMap::new())),
            control: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Lock guarding start/stop of one instance
    async fn control_lock(&self, id: i64) -> Arc<Mutex<()>> {
        self.control.lock().await.entry(id).or_default().clone()
    }

    pub async fn is_running(&self, id: i64) -> bool {
        self.running.read().await.contains_key(&id)
    }

    /// Ids of all running instances, sorted
    pub async fn running_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.running.read().await.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Start an instance on the daemon
    ///
    /// # Returns
    /// `false` when it was already running and no request was sent
    pub async fn start_instance(&self, instance: &Instance) -> Result<bool, DaemonError> {
        let lock = self.control_lock(instance.id).await;
        let _guard = lock.lock().await;

        if self.is_running(instance.id).await {
            tracing::debug!("[Daemon] Instance {} already running", instance.id);
            return Ok(false);
        }

        let request = InstanceLoadReq::from_instance(instance, DEFAULT_VOLUME);
        self.post("instance/start", &request).await?;

        self.running.write().await.insert(instance.id, instance.clone());
        tracing::info!("[Daemon] Started instance {} ({})", instance.id, instance.name);
        Ok(true)
    }

    /// Stop an instance on the daemon
    ///
    /// # Returns
    /// `false` when it was not running and no request was sent
    pub async fn stop_instance(&self, id: i64) -> Result<bool, DaemonError> {
        let lock = self.control_lock(id).await;
        let _guard = lock.lock().await;

        if !self.is_running(id).await {
            tracing::debug!("[Daemon] Instance {} not running", id);
            return Ok(false);
        }

        self.post("instance/stop", &GenericRequest { id }).await?;

        self.running.write().await.remove(&id);
        tracing::info!("[Daemon] Stopped instance {}", id);
        Ok(true)
    }

    async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<(), DaemonError> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self.client.post(&url).json(body).send().await.map_err(|e| {
            tracing::warn!("[Daemon] POST {} failed: {}", url, e);
            DaemonError::Transport(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.msg);
        tracing::warn!("[Daemon] POST {} returned {}: {:?}", url, status, message);
        Err(DaemonError::Status {
            status: status.as_u16(),
            message,
        })
    }
}
