/**
 * Router Configuration
 *
 * Assembles the protected API and socket routes behind the auth
 * middleware, adds the public login route and wraps everything in the
 * CORS layer for the configured frontend origin.
 */

use axum::http::{header, HeaderValue, Method};
use axum::{middleware, Router};
use tower_http::cors::CorsLayer;

use crate::backend::auth::login;
use crate::backend::error::BackendError;
use crate::backend::middleware::auth_middleware;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::routes::socket_routes::configure_socket_routes;
use crate::backend::server::state::AppState;
use crate::shared::ConfigError;

/// Create the Axum router with all routes configured
///
/// # Errors
///
/// Fails if the configured CORS origin is not a valid header value.
pub fn create_router(app_state: AppState) -> Result<Router<()>, BackendError> {
    let cors = cors_layer(&app_state.config.cors_origin)?;

    let protected = configure_socket_routes(configure_api_routes(Router::new())).route_layer(
        middleware::from_fn_with_state(app_state.clone(), auth_middleware),
    );

    let router = Router::new()
        .route("/api/auth/login", axum::routing::post(login))
        .merge(protected)
        .fallback(|| async {
            BackendError::handler(axum::http::StatusCode::NOT_FOUND, "Not Found")
        })
        .layer(cors);

    Ok(router.with_state(app_state))
}

fn cors_layer(origin: &str) -> Result<CorsLayer, ConfigError> {
    let origin = HeaderValue::from_str(origin).map_err(|e| ConfigError::InvalidValue {
        key: "cors_origin",
        message: e.to_string(),
    })?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]))
}
