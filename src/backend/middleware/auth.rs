/**
 * Authentication Middleware
 *
 * Protects every route except login. The token is read from the
 * `Authorization: Bearer` header, or from the `token` query parameter for
 * WebSocket upgrades, where browsers cannot set headers. After the token
 * verifies, the user is loaded and must still exist and be enabled.
 */

use axum::{
    extract::{FromRequestParts, Query, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode, Uri},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;

use crate::backend::auth::sessions::verify_token;
use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Authenticated user data extracted from the session token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub username: String,
    pub authorities: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// Pull the raw token out of the header or the query string
pub fn extract_token(headers: &HeaderMap, uri: &Uri) -> Option<String> {
    if let Some(value) = headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok()) {
        return value.strip_prefix("Bearer ").map(str::to_string);
    }

    Query::<TokenQuery>::try_from_uri(uri)
        .ok()
        .and_then(|Query(query)| query.token)
        .filter(|token| !token.is_empty())
}

/// Authentication middleware
///
/// 1. Extracts the token
/// 2. Verifies signature and expiry
/// 3. Loads the user and checks `enabled`
/// 4. Attaches [`AuthenticatedUser`] to the request extensions
///
/// Returns 401 Unauthorized if any step fails
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let token = extract_token(request.headers(), request.uri()).ok_or_else(|| {
        tracing::warn!("[Auth] Missing credentials for {}", request.uri().path());
        BackendError::unauthorized("Missing or malformed credentials")
    })?;

    let claims = verify_token(&app_state.config, &token).map_err(|e| {
        tracing::warn!("[Auth] Invalid token: {:?}", e);
        BackendError::unauthorized("Invalid or expired token")
    })?;

    let user_id = claims
        .user_id()
        .ok_or_else(|| BackendError::unauthorized("Invalid or expired token"))?;

    let user = get_user_by_id(&app_state.db_pool, user_id)
        .await?
        .filter(|user| user.enabled)
        .ok_or_else(|| {
            tracing::warn!("[Auth] Token for missing or disabled user {}", user_id);
            BackendError::unauthorized("Account not available")
        })?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id: user.id,
        username: user.username,
        authorities: claims.authorities,
    });

    Ok(next.run(request).await)
}

/// Axum extractor for the user attached by [`auth_middleware`]
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("[Auth] AuthenticatedUser not found in request extensions");
                StatusCode::UNAUTHORIZED
            })?;

        Ok(AuthUser(user))
    }
}
