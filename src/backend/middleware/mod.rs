//! Middleware Module
//!
//! HTTP middleware applied by the router.
//!
//! - **`auth`** - Token authentication for everything except login

pub mod auth;

pub use auth::{auth_middleware, extract_token, AuthUser, AuthenticatedUser};
