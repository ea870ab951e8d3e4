//! API configuration
//!
//! Values come from `API_*` environment variables layered over the defaults
//! below, e.g. `API_PORT=9000` or `API_STRICT_TRANSITIONS=true`.

use std::time::Duration;

use serde::Deserialize;

use domain_claims::TransitionPolicy;
use infra_db::DatabaseConfig;
use infra_notify::DEFAULT_CHANNEL_CAPACITY;

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database URL
    pub database_url: String,
    /// Maximum pooled database connections
    pub max_connections: u32,
    /// Seconds a request waits for a pooled connection
    pub db_acquire_timeout_secs: u64,
    /// Log level, used when `RUST_LOG` is unset
    pub log_level: String,
    /// Forbid reopening decided claims
    pub strict_transitions: bool,
    /// Provision the sample users on start-up
    pub seed_sample_data: bool,
    /// Buffered notifications per channel
    pub notification_capacity: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: "postgres://localhost/claims".to_string(),
            max_connections: 10,
            db_acquire_timeout_secs: 30,
            log_level: "info".to_string(),
            strict_transitions: false,
            seed_sample_data: false,
            notification_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let defaults = Self::default();

        config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("database_url", defaults.database_url)?
            .set_default("max_connections", i64::from(defaults.max_connections))?
            .set_default("db_acquire_timeout_secs", defaults.db_acquire_timeout_secs as i64)?
            .set_default("log_level", defaults.log_level)?
            .set_default("strict_transitions", defaults.strict_transitions)?
            .set_default("seed_sample_data", defaults.seed_sample_data)?
            .set_default("notification_capacity", defaults.notification_capacity as i64)?
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Pool settings for `infra_db`
    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig::new(self.database_url.clone())
            .max_connections(self.max_connections)
            .acquire_timeout(Duration::from_secs(self.db_acquire_timeout_secs))
    }

    /// Transition policy selected by `strict_transitions`
    pub fn transition_policy(&self) -> TransitionPolicy {
        if self.strict_transitions {
            TransitionPolicy::Strict
        } else {
            TransitionPolicy::Permissive
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();

        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.transition_policy(), TransitionPolicy::Permissive);
        assert!(!config.seed_sample_data);
    }

    #[test]
    fn test_database_config_follows_api_settings() {
        let config = ApiConfig {
            database_url: "postgres://db/claims".to_string(),
            max_connections: 4,
            db_acquire_timeout_secs: 3,
            ..ApiConfig::default()
        };

        let pool = config.database_config();
        assert_eq!(pool.url, "postgres://db/claims");
        assert_eq!(pool.max_connections, 4);
        assert_eq!(pool.acquire_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_strict_flag_selects_policy() {
        let config = ApiConfig {
            strict_transitions: true,
            ..ApiConfig::default()
        };
        assert_eq!(config.transition_policy(), TransitionPolicy::Strict);
    }
}
