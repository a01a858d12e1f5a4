//! Batch resolver configuration types

use std::time::Duration;

use crate::{parse_env, ConfigResult};

/// Per-request batch resolver configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    /// Keep resolved values for the rest of the request
    pub cache_enabled: bool,

    /// Maximum distinct keys per fetch (0 = unbounded)
    pub max_batch_size: usize,

    /// Delay before an open batch is flushed, in milliseconds (0 = yield once)
    pub flush_delay_ms: u64,
}

impl BatchConfig {
    /// Load batch configuration from environment variables
    pub fn from_env() -> ConfigResult<Self> {
        Ok(Self {
            cache_enabled: parse_env("BATCH_CACHE_ENABLED", true)?,
            max_batch_size: parse_env("BATCH_MAX_SIZE", 0)?,
            flush_delay_ms: parse_env("BATCH_FLUSH_DELAY_MS", 1)?,
        })
    }

    /// Flush delay as a duration
    pub fn flush_delay(&self) -> Duration {
        Duration::from_millis(self.flush_delay_ms)
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            max_batch_size: 0,
            flush_delay_ms: 1,
        }
    }
}
