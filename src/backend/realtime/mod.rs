//! Real-time Notification Module
//!
//! Pushes "this listing changed" notices to connected browser clients over
//! a WebSocket, so admin views can re-fetch instead of polling.
//!
//! # Architecture
//!
//! - **`registry`** - Live sessions and their topic subscriptions
//! - **`broadcast`** - `Notifier`, fans `UPDATE` frames out to subscribers
//! - **`subscription`** - WebSocket endpoint and inbound frame handling
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs          - Module exports and documentation
//! ├── registry.rs     - Session registry
//! ├── broadcast.rs    - Update fan-out
//! └── subscription.rs - Socket handler
//! ```
//!
//! # Flow
//!
//! 1. A client opens `GET /socket` and sends `SUBSCRIBE\n\n/api/instance`
//! 2. An HTTP handler mutates an instance and calls
//!    `Notifier::notify_resource(ResourceKind::Instances)`
//! 3. The notifier queues `UPDATE\n\n/api/instance` for every session
//!    subscribed to that topic
//!
//! Notifications are not transactional with the database write; clients
//! re-fetch on `UPDATE`, so eventual delivery is enough.

/// Session registry
pub mod registry;

/// Update fan-out
pub mod broadcast;

/// WebSocket subscription handler
pub mod subscription;

// Re-export commonly used types and functions
pub use broadcast::Notifier;
pub use registry::{CloseStatus, RegistryError, SessionId, SessionRegistry};
pub use subscription::{handle_client_payload, handle_socket_upgrade};
