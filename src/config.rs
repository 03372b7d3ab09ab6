//! Application configuration.
//!
//! Settings are read from the process environment (after `.env` has been
//! loaded by `dotenvy` in `main`). Parsing goes through a lookup function so
//! tests can supply values without touching the real environment.
//!
//! # Environment Variables
//!
//! - `HOST`: Server host address (default: `0.0.0.0`)
//! - `PORT`: Server port (default: `3000`)
//! - `APP_ENV`: `development` | `production` (default) | `test`
//! - `LOG_FORMAT`: `pretty` (default) | `json`
//! - `STORAGE_MODE`: `in_memory` (default) | `postgres`
//! - `DATABASE_URL`: `PostgreSQL` connection URL (required when `STORAGE_MODE=postgres`)
//! - `DATABASE_MAX_CONNECTIONS`: pool size (default: `10`)

use std::env;
use std::str::FromStr;

use thiserror::Error;

use crate::infrastructure::RepositoryConfig;

// =============================================================================
// Environment
// =============================================================================

/// Deployment environment.
///
/// Only `Development` changes behaviour: error responses then carry a
/// diagnostic `stack` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Development,
    #[default]
    Production,
    Test,
}

impl Environment {
    /// Returns true if diagnostic traces should be exposed to clients.
    #[must_use]
    pub const fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = ConfigurationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            _ => Err(ConfigurationError::InvalidEnvironment(value.to_string())),
        }
    }
}

// =============================================================================
// Log Format
// =============================================================================

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigurationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(ConfigurationError::InvalidLogFormat(value.to_string())),
        }
    }
}

// =============================================================================
// Listener
// =============================================================================

/// Address the HTTP listener binds to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface or host name (`HOST`).
    pub host: String,
    /// TCP port (`PORT`); `0` asks the OS for a free port.
    pub port: u16,
}

impl ServerConfig {
    /// `host:port`, suitable for `TcpListener::bind`.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

// =============================================================================
// Application Configuration
// =============================================================================

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listener settings.
    pub server: ServerConfig,
    /// Deployment environment.
    pub environment: Environment,
    /// Log output format.
    pub log_format: LogFormat,
    /// Store selection and connection settings.
    pub repository: RepositoryConfig,
}

impl AppConfig {
    /// Creates a configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if any variable holds an invalid value or
    /// `DATABASE_URL` is missing when `STORAGE_MODE=postgres`.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Creates a configuration from an arbitrary key lookup.
    ///
    /// Empty and whitespace-only values are treated as unset.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = ServerConfig::default();
        let host = read("HOST").unwrap_or(defaults.host);
        let port = match read("PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| ConfigurationError::InvalidPort(value))?,
            None => defaults.port,
        };

        let environment = read("APP_ENV")
            .map(|value| value.parse::<Environment>())
            .transpose()?
            .unwrap_or_default();

        let log_format = read("LOG_FORMAT")
            .map(|value| value.parse::<LogFormat>())
            .transpose()?
            .unwrap_or_default();

        let repository = RepositoryConfig::from_lookup(read)?;

        Ok(Self {
            server: ServerConfig { host, port },
            environment,
            log_format,
            repository,
        })
    }
}

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur while reading configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// `PORT` is not a valid port number.
    #[error("Invalid port: '{0}'. Expected an integer between 0 and 65535")]
    InvalidPort(String),

    /// `APP_ENV` is not recognized.
    #[error("Invalid environment: '{0}'. Expected 'development', 'production' or 'test'")]
    InvalidEnvironment(String),

    /// `LOG_FORMAT` is not recognized.
    #[error("Invalid log format: '{0}'. Expected 'pretty' or 'json'")]
    InvalidLogFormat(String),

    /// Invalid storage mode value.
    #[error("Invalid storage mode: '{0}'. Expected 'in_memory' or 'postgres'")]
    InvalidStorageMode(String),

    /// `DATABASE_MAX_CONNECTIONS` is not a positive integer.
    #[error("Invalid max connections: '{0}'. Expected a positive integer")]
    InvalidMaxConnections(String),

    /// Missing `DATABASE_URL` when storage mode is Postgres.
    #[error("DATABASE_URL environment variable is required when STORAGE_MODE=postgres")]
    MissingDatabaseUrl,
}

// =============================================================================
// Tests
// =============================================================================
