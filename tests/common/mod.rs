//! Common test utilities and helpers
//!
//! - Database fixtures (in-memory SQLite)
//! - Application fixtures (axum-test server, live listener)
//! - Authentication helpers
//! - Custom assertion macros

pub mod assertions;
pub mod auth_helpers;
pub mod database;

pub use app::*;
pub use auth_helpers::*;
pub use database::*;
