//! Shared Module
//!
//! Types used by both the server and socket clients: the text frame codec,
//! topic identifiers, shared errors and application configuration. Nothing
//! here depends on the web framework or the database, so the module builds
//! without the `ssr` feature.

/// Socket frame codec
pub mod message;

/// Topics and resource-change kinds
pub mod event;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use message::{ClientMessage, ClientMethod, DecodeError, ServerMessage, ServerMethod, SocketMessage};
pub use event::{ResourceKind, Topic};
pub use error::SharedError;
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
