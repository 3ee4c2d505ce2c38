/**
 * Backend Error Types
 *
 * This module defines the error type returned by HTTP handlers and
 * server setup code. Every variant maps to one HTTP status code.
 *
 * # Error Categories
 *
 * ## Request Errors
 *
 * - Invalid input (400), missing resources (404), duplicates (409)
 * - Missing or invalid credentials (401)
 *
 * ## Upstream Errors
 *
 * - Instance control daemon unreachable or refusing (502)
 *
 * ## Internal Errors
 *
 * - Database, password hashing and configuration failures (500). Their
 *   details are logged, not returned to the caller.
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::instances::daemon::DaemonError;
use crate::shared::{ConfigError, SharedError};

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use yamba_management::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::not_found("user", 7);
/// assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error with an explicit status code
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// A requested resource does not exist
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: String },

    /// The request conflicts with existing state
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Missing, invalid or expired credentials
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Shared error (validation, decoding)
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Database error
    ///
    /// Unique and foreign-key violations are reported as 409 and 404.
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// Migration error during startup
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    /// Instance control daemon error
    #[error(transparent)]
    DaemonError(#[from] DaemonError),

    /// Configuration error
    #[error(transparent)]
    ConfigError(#[from] ConfigError),

    /// Password hashing or verification error
    #[error("Password error: {0}")]
    PasswordError(#[from] bcrypt::BcryptError),

    /// Session token could not be created or verified
    #[error("Token error: {0}")]
    TokenError(#[from] jsonwebtoken::errors::Error),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `HandlerError` - Uses the status code from the error
    /// - `NotFound` - 404, `Conflict` - 409, `Unauthorized` - 401
    /// - `SharedError` - 400 for validation and decoding, 500 otherwise
    /// - `DatabaseError` - 409 unique violation, 404 missing row or
    ///   dangling reference, 500 otherwise
    /// - `DaemonError` - 502
    /// - `TokenError` - 401
    /// - everything else - 500
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::SharedError(err) => match err {
                SharedError::ValidationError { .. } => StatusCode::BAD_REQUEST,
                SharedError::DecodeError(_) => StatusCode::BAD_REQUEST,
                SharedError::SerializationError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::DatabaseError(err) => database_status(err),
            Self::DaemonError(_) => StatusCode::BAD_GATEWAY,
            Self::TokenError(_) => StatusCode::UNAUTHORIZED,
            Self::MigrationError(_) | Self::ConfigError(_) | Self::PasswordError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the error message returned to the client
    ///
    /// Internal failures return a generic message; the detail is logged by
    /// the response conversion instead.
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::Conflict { message } | Self::Unauthorized { message } => message.clone(),
            Self::NotFound { .. } | Self::SharedError(_) | Self::DaemonError(_) => self.to_string(),
            Self::DatabaseError(err) => match database_status(err) {
                StatusCode::CONFLICT => "Resource already exists".to_string(),
                StatusCode::NOT_FOUND => "Referenced resource not found".to_string(),
                _ => "Internal server error".to_string(),
            },
            Self::TokenError(_) => "Invalid or expired token".to_string(),
            Self::MigrationError(_) | Self::ConfigError(_) | Self::PasswordError(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

fn database_status(err: &sqlx::Error) -> StatusCode {
    match err {
        sqlx::Error::RowNotFound => StatusCode::NOT_FOUND,
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => StatusCode::CONFLICT,
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
