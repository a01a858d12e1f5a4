//! API server configuration

use std::env;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use quill_batch::{BatchOptions, TokioScheduler};
use quill_shared_config::{BatchConfig, CommonConfig, DatabaseConfig, Environment};

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Common configuration shared with other services
    pub common: CommonConfig,

    /// Server port (default: 8080)
    pub port: u16,

    /// CORS allowed origins (optional)
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// In production mode `DATABASE_URL` must be set explicitly. In
    /// development/staging mode the local SQLite file is used by default.
    pub fn from_env() -> Result<Self> {
        let environment = Environment::from_str(
            &env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        )
        .unwrap_or_default();

        if environment.is_production() {
            Self::validate_database_url()?;
        }

        let common = CommonConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        Ok(Self {
            common,

            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid PORT value")?,

            cors_allowed_origins: env::var("CORS_ORIGINS").ok().map(|s| {
                s.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            }),
        })
    }

    /// Validate that DATABASE_URL is explicitly set in production
    fn validate_database_url() -> Result<()> {
        match env::var("DATABASE_URL") {
            Ok(url) if !url.is_empty() => Ok(()),
            _ => {
                bail!(
                    "DATABASE_URL environment variable is required in production. \
                     Please set your SQLite connection string."
                );
            }
        }
    }

    /// Get database configuration
    pub fn database(&self) -> &DatabaseConfig {
        &self.common.database
    }

    /// Get batch resolver configuration
    pub fn batch(&self) -> &BatchConfig {
        &self.common.batch
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.common.environment.is_production()
    }
}

/// Build per-request resolver options from the batch configuration
pub fn batch_options(config: &BatchConfig) -> BatchOptions {
    BatchOptions::new()
        .caching(config.cache_enabled)
        .max_batch_size(config.max_batch_size)
}

/// Build the flush scheduler from the batch configuration
pub fn batch_scheduler(config: &BatchConfig) -> TokioScheduler {
    TokioScheduler::with_delay(config.flush_delay())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    // Mutex to ensure tests that modify environment variables don't run in parallel
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Helper to temporarily set environment variables for a test
    struct EnvGuard {
        vars: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        fn new(vars: &[(&str, &str)]) -> Self {
            let saved: Vec<_> = vars
                .iter()
                .map(|(k, v)| {
                    let old = env::var(*k).ok();
                    env::set_var(*k, *v);
                    (k.to_string(), old)
                })
                .collect();
            Self { vars: saved }
        }

        fn remove_vars(vars: &[&str]) -> Self {
            let saved: Vec<_> = vars
                .iter()
                .map(|k| {
                    let old = env::var(*k).ok();
                    env::remove_var(*k);
                    (k.to_string(), old)
                })
                .collect();
            Self { vars: saved }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (k, v) in &self.vars {
                match v {
                    Some(val) => env::set_var(k, val),
                    None => env::remove_var(k),
                }
            }
        }
    }

    #[test]
    fn test_database_url_required_in_production() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let _guard = EnvGuard::remove_vars(&["DATABASE_URL"]);

        let result = Config::validate_database_url();
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("DATABASE_URL"));
        assert!(err.contains("required in production"));
    }

    #[test]
    fn test_database_url_valid_when_set() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let _guard = EnvGuard::new(&[("DATABASE_URL", "sqlite://quill.db")]);

        assert!(Config::validate_database_url().is_ok());
    }

    #[test]
    fn test_empty_database_url_fails() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let _guard = EnvGuard::new(&[("DATABASE_URL", "")]);

        assert!(Config::validate_database_url().is_err());
    }

    #[test]
    fn test_from_env_parses_port_and_origins() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let _guard = EnvGuard::new(&[
            ("ENVIRONMENT", "development"),
            ("PORT", "9090"),
            ("CORS_ORIGINS", "http://a.test, ,http://b.test"),
        ]);

        let config = Config::from_env().unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(
            config.cors_allowed_origins,
            Some(vec!["http://a.test".to_string(), "http://b.test".to_string()])
        );
        assert!(!config.is_production());
    }

    #[test]
    fn test_invalid_port_fails() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let _guard = EnvGuard::new(&[("PORT", "not-a-port")]);

        let err = Config::from_env().unwrap_err().to_string();
        assert!(err.contains("Invalid PORT value"));
    }

    #[test]
    fn test_batch_options_mapping() {
        let config = BatchConfig {
            cache_enabled: false,
            max_batch_size: 50,
            flush_delay_ms: 3,
        };

        let options = batch_options(&config);
        assert!(!options.caching);
        assert_eq!(options.max_batch_size, Some(50));
        assert_eq!(batch_scheduler(&config).delay(), Duration::from_millis(3));

        let unbounded = batch_options(&BatchConfig::default());
        assert_eq!(unbounded.max_batch_size, None);
    }
}
