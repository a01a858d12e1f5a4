//! Database configuration types

use crate::{get_env_or_default, parse_env, ConfigResult};

/// Default SQLite database, created on first connect
pub const DEFAULT_DATABASE_URL: &str = "sqlite://app.db?mode=rwc";

/// SQLite database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Full connection URL (e.g., sqlite://app.db?mode=rwc)
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,

    /// Insert the default authors when the table is empty
    pub seed: bool,
}

impl DatabaseConfig {
    /// Load database configuration from environment variables
    pub fn from_env() -> ConfigResult<Self> {
        Ok(Self {
            url: get_env_or_default("DATABASE_URL", DEFAULT_DATABASE_URL),
            max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 5)?,
            connect_timeout_secs: parse_env("DATABASE_CONNECT_TIMEOUT", 30)?,
            seed: parse_env("SEED_DATABASE", true)?,
        })
    }

    /// Create a configuration with a custom URL (useful for testing)
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Check whether the URL points at an in-memory database
    ///
    /// Every connection to `sqlite::memory:` opens its own empty database, so
    /// such pools must be limited to a single connection.
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 5,
            connect_timeout_secs: 30,
            seed: true,
        }
    }
}
