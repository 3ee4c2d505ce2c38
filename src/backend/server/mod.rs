//! Server Module
//!
//! Server initialization, application state and database setup.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState and FromRef implementations
//! ├── config.rs       - Database pool and migrations
//! └── init.rs         - Server initialization and app creation
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Database**: connect and migrate
//! 2. **Bootstrap**: root account on first start
//! 3. **State**: registry, notifier, daemon client
//! 4. **Autostart**: start flagged instances
//! 5. **Router**: routes, auth middleware, CORS

/// Application state management
pub mod state;

/// Database configuration
pub mod config;

/// Server initialization
pub mod init;

pub use init::{create_app, init_state};
pub use state::AppState;
