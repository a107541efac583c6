//! Database configuration read from the process environment.
//!
//! Lookups go through a caller-supplied function so tests can provide values
//! without mutating the process environment.

use crate::inventory::adapters::postgres::InventoryPgPool;
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use std::num::ParseIntError;
use thiserror::Error;

/// Environment variable holding the `PostgreSQL` connection URL.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Environment variable overriding the connection pool size.
pub const POOL_SIZE_VAR: &str = "WIDGET_AUDIT_POOL_SIZE";

/// Pool size used when [`POOL_SIZE_VAR`] is unset.
pub const DEFAULT_POOL_SIZE: u32 = 8;

/// Errors raised while loading configuration or building the pool.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("environment variable {0} is not set")]
    Missing(&'static str),

    /// The pool size is not a positive integer.
    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidPoolSize {
        /// Variable that held the value.
        var: &'static str,
        /// Rejected value.
        value: String,
        /// Underlying parse failure, absent for zero.
        #[source]
        source: Option<ParseIntError>,
    },

    /// The connection pool could not be created.
    #[error("failed to build connection pool: {0}")]
    Pool(#[from] PoolError),
}

/// Connection settings for the `PostgreSQL` adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    url: String,
    max_connections: u32,
}

impl DatabaseConfig {
    /// Creates a configuration with the default pool size.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: DEFAULT_POOL_SIZE,
        }
    }

    /// Overrides the pool size.
    #[must_use]
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Reads [`DATABASE_URL_VAR`] and [`POOL_SIZE_VAR`] from the environment.
    ///
    /// # Errors
    ///
    /// See [`DatabaseConfig::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when the URL is unset or blank and
    /// [`ConfigError::InvalidPoolSize`] when the pool size is zero or not a
    /// number.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let url = lookup(DATABASE_URL_VAR)
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::Missing(DATABASE_URL_VAR))?;

        let max_connections = lookup(POOL_SIZE_VAR)
            .map_or(Ok(DEFAULT_POOL_SIZE), |raw| parse_pool_size(&raw))?;

        Ok(Self {
            url,
            max_connections,
        })
    }

    /// Returns the connection URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the maximum pool size.
    #[must_use]
    pub const fn max_connections(&self) -> u32 {
        self.max_connections
    }

    /// Builds an r2d2 pool for the configured database.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pool`] if the pool cannot establish its initial
    /// connections.
    pub fn build_pool(&self) -> Result<InventoryPgPool, ConfigError> {
        let manager = ConnectionManager::<PgConnection>::new(self.url.as_str());
        let pool = Pool::builder()
            .max_size(self.max_connections)
            .build(manager)?;
        tracing::debug!(
            max_connections = self.max_connections,
            "built inventory connection pool"
        );
        Ok(pool)
    }
}

fn parse_pool_size(raw: &str) -> Result<u32, ConfigError> {
    let invalid = |source| ConfigError::InvalidPoolSize {
        var: POOL_SIZE_VAR,
        value: raw.to_owned(),
        source,
    };
    match raw.trim().parse::<u32>() {
        Ok(0) => Err(invalid(None)),
        Ok(size) => Ok(size),
        Err(err) => Err(invalid(Some(err))),
    }
}
