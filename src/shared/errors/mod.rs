//! Error Types
//!
//! Configuration errors raised while binding and building datasources, and
//! errors raised later when a pool is opened.

use thiserror::Error;

/// Errors raised while binding `db.*` properties or building datasources.
///
/// Every variant is fatal to the build call.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("{prefix}.num is null")]
    MissingNum { prefix: String },

    #[error("{prefix}.user or {prefix}.user.[index] is null")]
    EmptyUser { prefix: String },

    #[error("{prefix}.password or {prefix}.password.[index] is null")]
    EmptyPassword { prefix: String },

    #[error("{prefix}.url.{index} is null")]
    MissingUrl { prefix: String, index: usize },

    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("unsupported driver '{0}'")]
    UnsupportedDriver(String),

    #[error("no datasource available")]
    NoDataSource,
}

impl ConfigurationError {
    pub(crate) fn invalid_value(key: impl Into<String>, message: impl ToString) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.to_string(),
        }
    }
}

/// Errors raised when turning a built datasource into a live pool.
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid JDBC url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Driver {driver} does not accept url scheme '{scheme}'")]
    SchemeMismatch { driver: String, scheme: String },
}
