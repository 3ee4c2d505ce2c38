//! Authentication Module
//!
//! User accounts, authorities, session tokens and the login endpoints.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── users.rs        - User model and database operations
//! ├── authorities.rs  - Authority model, grants, effective authority query
//! ├── sessions.rs     - JWT token management
//! ├── bootstrap.rs    - Root account creation on first start
//! └── handlers/       - HTTP handlers
//!     ├── mod.rs          - Handler exports
//!     ├── types.rs        - Request/response types
//!     ├── login.rs        - POST /api/auth/login
//!     ├── me.rs           - GET /api/auth/me
//!     └── authorities.rs  - Authority listing and grants
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Login**: username and password → credentials verified → JWT returned
//! 2. **Requests**: JWT in `Authorization: Bearer` (or `?token=` for the
//!    socket upgrade) → verified by `middleware::auth`
//! 3. **Get Me**: caller and current authorities
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - Tokens are HS256 JWTs with a configurable lifetime
//! - Disabled users cannot log in and existing tokens stop working
//! - Invalid credentials return 401 (no information leakage)

/// User data model and database operations
pub mod users;

/// Authorities and grants
pub mod authorities;

/// JWT token generation and validation
pub mod sessions;

/// Root account bootstrap
pub mod bootstrap;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use bootstrap::ensure_root_user;
pub use handlers::types::{AuthResponse, LoginRequest, UserResponse};
pub use handlers::{get_me, login};
