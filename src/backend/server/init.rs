/**
 * Server Initialization
 *
 * # Initialization Process
 *
 * 1. Open the database and run migrations (fatal on failure)
 * 2. Make sure the root account exists
 * 3. Create the daemon client and the application state
 * 4. Start autostart instances (failures are logged, not fatal)
 * 5. Build the router
 */

use axum::Router;

use crate::backend::auth::ensure_root_user;
use crate::backend::error::BackendError;
use crate::backend::instances::{autostart_instances, DaemonService};
use crate::backend::routes::create_router;
use crate::backend::server::config::load_database;
use crate::backend::server::state::AppState;
use crate::shared::AppConfig;

/// Build the application state from configuration
pub async fn init_state(config: AppConfig) -> Result<AppState, BackendError> {
    let db_pool = load_database(&config.database_url).await?;

    ensure_root_user(&db_pool, config.bcrypt_cost).await?;

    let daemon = DaemonService::new(config.daemon_base_url())?;
    let app_state = AppState::new(config, db_pool, daemon);

    if let Err(e) = autostart_instances(&app_state.db_pool, &app_state.daemon).await {
        tracing::warn!("[Server] Autostart skipped: {}", e);
    }

    Ok(app_state)
}

/// Create and configure the Axum application
pub async fn create_app(config: AppConfig) -> Result<Router<()>, BackendError> {
    tracing::info!("Initializing yamba management server");

    let app_state = init_state(config).await?;
    let app = create_router(app_state)?;

    tracing::info!("Router configured");
    Ok(app)
}
