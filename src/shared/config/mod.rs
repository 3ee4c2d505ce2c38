//! Application configuration module
//!
//! Settings are layered, lowest precedence first:
//!
//! 1. Built-in defaults (`AppConfig::default()`)
//! 2. A TOML file named by `YAMBA_CONFIG`, if set
//! 3. Environment variables
//!
//! ```toml
//! bind_address = "0.0.0.0:8080"
//! database_url = "sqlite://yamba.db"
//! daemon_url = "http://127.0.0.1:1337"
//! cors_origin = "http://localhost:3000"
//! ```

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable pointing at the TOML config file
pub const CONFIG_PATH_ENV: &str = "YAMBA_CONFIG";

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";
const DEFAULT_DATABASE_URL: &str = "sqlite://yamba.db";
const DEFAULT_JWT_SECRET: &str = "change-me";
const DEFAULT_TOKEN_TTL_HOURS: u64 = 24;
/// One year
const MAX_TOKEN_TTL_HOURS: u64 = 24 * 365;
const DEFAULT_DAEMON_URL: &str = "http://127.0.0.1:1337";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_BCRYPT_COST: u32 = 12;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Socket address the HTTP server listens on
    pub bind_address: String,
    /// sqlx connection string (SQLite)
    pub database_url: String,
    /// HMAC secret for session tokens
    pub jwt_secret: String,
    /// Session token lifetime
    pub token_ttl_hours: u64,
    /// Base URL of the instance control daemon
    pub daemon_url: String,
    /// Origin allowed to call the API with credentials
    pub cors_origin: String,
    /// bcrypt work factor for password hashes
    pub bcrypt_cost: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
            daemon_url: DEFAULT_DAEMON_URL.to_string(),
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load defaults, then the optional config file, then the environment
    pub fn load() -> Result<Self, ConfigError> {
        let config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        let config = config.with_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML file; missing keys keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply overrides from an environment lookup
    ///
    /// Takes the lookup as a closure so tests don't have to touch the
    /// process environment.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("YAMBA_BIND") {
            self.bind_address = value;
        }
        if let Some(value) = lookup("DATABASE_URL") {
            self.database_url = value;
        }
        if let Some(value) = lookup("JWT_SECRET") {
            self.jwt_secret = value;
        }
        if let Some(value) = lookup("YAMBA_TOKEN_TTL_HOURS") {
            self.token_ttl_hours = parse_number("YAMBA_TOKEN_TTL_HOURS", &value)?;
        }
        if let Some(value) = lookup("YAMBA_DAEMON_URL") {
            self.daemon_url = value;
        }
        if let Some(value) = lookup("YAMBA_CORS_ORIGIN") {
            self.cors_origin = value;
        }
        if let Some(value) = lookup("YAMBA_BCRYPT_COST") {
            self.bcrypt_cost = parse_number("YAMBA_BCRYPT_COST", &value)?;
        }
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_address
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue {
                key: "bind_address",
                message: e.to_string(),
            })?;

        if self.database_url.is_empty() {
            return Err(ConfigError::MissingValue("database_url"));
        }
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::MissingValue("jwt_secret"));
        }
        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&self.token_ttl_hours) {
            return Err(ConfigError::InvalidValue {
                key: "token_ttl_hours",
                message: format!("must be between 1 and {MAX_TOKEN_TTL_HOURS}"),
            });
        }
        if !is_http_url(&self.daemon_url) {
            return Err(ConfigError::InvalidUrl(self.daemon_url.clone()));
        }
        if !is_http_url(&self.cors_origin) {
            return Err(ConfigError::InvalidUrl(self.cors_origin.clone()));
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::InvalidValue {
                key: "bcrypt_cost",
                message: "must be between 4 and 31".to_string(),
            });
        }
        if self.jwt_secret == DEFAULT_JWT_SECRET {
            tracing::warn!("[Config] JWT_SECRET is not set, using the built-in development secret");
        }
        Ok(())
    }

    /// Daemon URL without a trailing slash
    pub fn daemon_base_url(&self) -> &str {
        self.daemon_url.trim_end_matches('/')
    }
}

fn is_http_url(url: &str) -> bool {
    url.strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .is_some_and(|rest| !rest.is_empty())
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            message: e.to_string(),
        })
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    bind_address: Option<String>,
    database_url: Option<String>,
    jwt_secret: Option<String>,
    token_ttl_hours: Option<u64>,
    daemon_url: Option<String>,
    cors_origin: Option<String>,
    bcrypt_cost: Option<u32>,
}

impl AppConfigBuilder {
    pub fn bind_address(mut self, address: impl Into<String>) -> Self {
        self.bind_address = Some(address.into());
        self
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = Some(secret.into());
        self
    }

    pub fn token_ttl_hours(mut self, hours: u64) -> Self {
        self.token_ttl_hours = Some(hours);
        self
    }

    pub fn daemon_url(mut self, url: impl Into<String>) -> Self {
        self.daemon_url = Some(url.into());
        self
    }

    pub fn cors_origin(mut self, origin: impl Into<String>) -> Self {
        self.cors_origin = Some(origin.into());
        self
    }

    pub fn bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = Some(cost);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            bind_address: self.bind_address.unwrap_or(defaults.bind_address),
            database_url: self.database_url.unwrap_or(defaults.database_url),
            jwt_secret: self.jwt_secret.unwrap_or(defaults.jwt_secret),
            token_ttl_hours: self.token_ttl_hours.unwrap_or(defaults.token_ttl_hours),
            daemon_url: self.daemon_url.unwrap_or(defaults.daemon_url),
            cors_origin: self.cors_origin.unwrap_or(defaults.cors_origin),
            bcrypt_cost: self.bcrypt_cost.unwrap_or(defaults.bcrypt_cost),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
    #[error("missing value: {0}")]
    MissingValue(&'static str),
}
