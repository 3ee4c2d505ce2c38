//! Yamba Management - Main Library
//!
//! Management service for yamba voice bots. It stores users, groups,
//! authorities and instance settings, controls instances through the
//! playback daemon, and notifies connected browsers over a WebSocket when
//! a listing changed.
//!
//! # Module Structure
//!
//! - **`shared`** - Transport-agnostic types
//!   - Socket message codec, topics, resource kinds
//!   - Application configuration
//!   - Shared error type and validators
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum HTTP server, auth middleware, CORS
//!   - Session registry and notification dispatch
//!   - SQLite persistence via sqlx
//!   - Daemon control client
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - enables the backend module and the server binary
//!
//! # Socket Protocol
//!
//! Frames are `METHOD\n\nBODY`. Clients send `SUBSCRIBE` and `DESUB` with
//! a listing path as body; the server replies `OK` or `BAD` and pushes
//! `UPDATE` with the topic whenever that listing changes.

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
