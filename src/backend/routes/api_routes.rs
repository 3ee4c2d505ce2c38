/**
 * API Routes
 *
 * REST resources under `/api`. Login is configured separately in the
 * router because it is the only route reachable without a token.
 *
 * # Routes
 *
 * ## Auth
 * - `GET /api/auth/me`
 *
 * ## Users
 * - `GET|POST /api/user`, `GET|PUT|DELETE /api/user/{id}`
 * - `PUT|DELETE /api/user/{id}/authority/{authority_id}`
 *
 * ## Groups
 * - `GET|POST /api/group`, `GET|PUT|DELETE /api/group/{id}`
 * - `PUT|DELETE /api/group/{id}/member/{user_id}`
 * - `PUT|DELETE /api/group/{id}/authority/{authority_id}`
 *
 * ## Instances
 * - `GET|POST /api/instance`, `GET|PUT|DELETE /api/instance/{id}`
 * - `PUT /api/instance/{id}/start`, `PUT /api/instance/{id}/stop`
 *
 * ## Authorities
 * - `GET /api/authority`
 */

use axum::routing::{get, put};
use axum::Router;

use crate::backend::auth::handlers::{
    get_me, grant_group_authority, grant_user_authority, list_authorities,
    revoke_group_authority, revoke_user_authority,
};
use crate::backend::{groups, instances, users};
use crate::backend::server::state::AppState;

/// Configure the protected API routes
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/auth/me", get(get_me))
        // Users
        .route("/api/user", get(users::list_users).post(users::create_user))
        .route(
            "/api/user/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/api/user/{id}/authority/{authority_id}",
            put(grant_user_authority).delete(revoke_user_authority),
        )
        // Groups
        .route("/api/group", get(groups::list_groups).post(groups::create_group))
        .route(
            "/api/group/{id}",
            get(groups::get_group)
                .put(groups::update_group)
                .delete(groups::delete_group),
        )
        .route(
            "/api/group/{id}/member/{user_id}",
            put(groups::add_member).delete(groups::remove_member),
        )
        .route(
            "/api/group/{id}/authority/{authority_id}",
            put(grant_group_authority).delete(revoke_group_authority),
        )
        // Instances
        .route(
            "/api/instance",
            get(instances::list_instances).post(instances::create_instance),
        )
        .route(
            "/api/instance/{id}",
            get(instances::get_instance)
                .put(instances::update_instance)
                .delete(instances::delete_instance),
        )
        .route("/api/instance/{id}/start", put(instances::start_instance))
        .route("/api/instance/{id}/stop", put(instances::stop_instance))
        // Authorities
        .route("/api/authority", get(list_authorities))
}
