/**
 * Application State Management
 *
 * `AppState` is the single state container handed to the router. Every
 * field is cheap to clone (pools, `Arc`s and handles around `Arc`s), and
 * the `FromRef` implementations let handlers extract just the part they
 * need, e.g. `State(pool): State<DbPool>`.
 */

use std::sync::Arc;

use axum::extract::FromRef;

use crate::backend::instances::daemon::DaemonService;
use crate::backend::realtime::{Notifier, SessionRegistry};
use crate::backend::server::config::DbPool;
use crate::shared::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,

    pub db_pool: DbPool,

    /// Connected socket sessions and their topics
    pub registry: SessionRegistry,

    /// Sends UPDATE frames to the sessions in `registry`
    pub notifier: Notifier,

    pub daemon: DaemonService,
}

impl AppState {
    pub fn new(config: AppConfig, db_pool: DbPool, daemon: DaemonService) -> Self {
        let registry = SessionRegistry::new();
        let notifier = Notifier::new(registry.clone());
        Self {
            config: Arc::new(config),
            db_pool,
            registry,
            notifier,
            daemon,
        }
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}

impl FromRef<AppState> for DbPool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}

impl FromRef<AppState> for SessionRegistry {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.registry.clone()
    }
}

impl FromRef<AppState> for Notifier {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.notifier.clone()
    }
}

impl FromRef<AppState> for DaemonService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.daemon.clone()
    }
}
