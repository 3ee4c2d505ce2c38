//! Backend Module
//!
//! Server side of the yamba management service: an Axum HTTP server with
//! a REST surface for users, groups, authorities and voice instances, and
//! a WebSocket endpoint that pushes listing-change notifications.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── server/         - Initialization, state, database
//! ├── routes/         - Route configuration
//! ├── realtime/       - Session registry, notifier, socket handler
//! ├── auth/           - Users, authorities, tokens, login
//! ├── middleware/     - Token authentication
//! ├── users/          - User administration handlers
//! ├── groups/         - Groups and membership
//! ├── instances/      - Instances and the daemon client
//! └── error/          - Error types
//! ```
//!
//! # Notifications
//!
//! Every successful mutation notifies the listing topics of the affected
//! resource kind. Subscribed sockets receive `UPDATE\n\n<topic>` and
//! re-fetch the listing over REST.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Socket sessions and notifications
pub mod realtime;

/// Backend error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// User administration
pub mod users;

/// Groups and membership
pub mod groups;

/// Voice instances
pub mod instances;

pub use error::BackendError;
pub use realtime::{Notifier, SessionRegistry};
pub use server::{create_app, AppState};
