//! Shared Error Types
//!
//! Errors that can be produced without a running server: input validation,
//! socket frame decoding and JSON handling.
//!
//! # Usage
//!
//! ```rust
//! use yamba_management::shared::error::SharedError;
//!
//! let error = SharedError::validation("username", "must not be empty");
//! assert!(error.to_string().contains("username"));
//! ```
use thiserror::Error;

use crate::shared::message::DecodeError;

/// Errors shared by the server and its clients
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// A request field failed validation
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// A socket frame could not be decoded
    #[error("Decode error: {0}")]
    DecodeError(#[from] DecodeError),

    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError { message: String },
}

impl SharedError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}

/// Check a username: 1-255 chars, ASCII alphanumerics plus `_`, `-` and `.`
pub fn validate_username(username: &str) -> Result<(), SharedError> {
    if username.is_empty() {
        return Err(SharedError::validation("username", "must not be empty"));
    }
    if username.len() > 255 {
        return Err(SharedError::validation(
            "username",
            "must be at most 255 characters",
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Err(SharedError::validation(
            "username",
            "may only contain letters, digits, '_', '-' and '.'",
        ));
    }
    Ok(())
}

/// Check a plaintext password before hashing
///
/// bcrypt only looks at the first 72 bytes, so longer input is rejected
/// instead of being silently truncated.
pub fn validate_password(password: &str) -> Result<(), SharedError> {
    if password.is_empty() {
        return Err(SharedError::validation("password", "must not be empty"));
    }
    if password.len() > 72 {
        return Err(SharedError::validation(
            "password",
            "must be at most 72 bytes",
        ));
    }
    Ok(())
}

/// Check a non-empty display name (groups, instances)
pub fn validate_name(field: &str, name: &str) -> Result<(), SharedError> {
    if name.trim().is_empty() {
        return Err(SharedError::validation(field, "must not be empty"));
    }
    if name.len() > 255 {
        return Err(SharedError::validation(field, "must be at most 255 characters"));
    }
    Ok(())
}
