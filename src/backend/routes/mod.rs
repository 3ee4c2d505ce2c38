//! Route Configuration Module
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs            - Module exports and documentation
//! ├── router.rs         - Main router creation, auth and CORS layers
//! ├── api_routes.rs     - REST endpoints under /api
//! └── socket_routes.rs  - WebSocket notification endpoint
//! ```
//!
//! # Route Organization
//!
//! 1. **Public** - `POST /api/auth/login`
//! 2. **Protected** - every other `/api` route and `GET /socket`, behind
//!    `middleware::auth_middleware`
//! 3. **Fallback** - JSON 404

/// Main router creation
pub mod router;

/// REST endpoints
pub mod api_routes;

/// Socket endpoint
pub mod socket_routes;

pub use router::create_router;
