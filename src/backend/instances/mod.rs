//! Instances Module
//!
//! Voice instances are stored connection settings that the playback daemon
//! can run. This module persists them and drives the daemon.
//!
//! # Module Structure
//!
//! ```text
//! instances/
//! ├── mod.rs       - Module exports
//! ├── db.rs        - Instance model and database operations
//! ├── daemon.rs    - HTTP client for the daemon and the running set
//! └── handlers.rs  - HTTP handlers (CRUD, start, stop)
//! ```

pub mod daemon;
pub mod db;
pub mod handlers;

pub use daemon::{DaemonError, DaemonService};
pub use db::{Instance, InstanceRequest};
pub use handlers::{
    autostart_instances, create_instance, delete_instance, get_instance, list_instances,
    start_instance, stop_instance, update_instance, InstanceView,
};
