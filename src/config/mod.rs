//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables use the `WORKFORCE` prefix and
//! `__` between nested keys.
//!
//! # Example
//!
//! ```no_run
//! use workforce_notifications::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod broadcast;
mod database;
mod error;
mod notifications;
mod redis;
mod server;

pub use auth::AuthConfig;
pub use broadcast::{BroadcastConfig, BroadcastDriver};
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use notifications::NotificationsConfig;
pub use redis::RedisConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL; notifications stay in memory when unset
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub redis: RedisConfig,

    /// Broadcast driver and socket endpoint
    #[serde(default)]
    pub broadcast: BroadcastConfig,

    /// Bearer token validation
    pub auth: AuthConfig,

    #[serde(default)]
    pub notifications: NotificationsConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `WORKFORCE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// - `WORKFORCE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `WORKFORCE__BROADCAST__DRIVER=redis` -> `broadcast.driver = Redis`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("WORKFORCE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.redis.validate()?;
        self.broadcast.validate(&self.server.environment)?;
        self.auth.validate(&self.server.environment)?;
        self.notifications.validate()?;
        if self.broadcast.driver == BroadcastDriver::Redis && !self.redis.is_configured() {
            return Err(ValidationError::RedisDriverWithoutUrl);
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 6] = [
        "WORKFORCE__AUTH__JWT_SECRET",
        "WORKFORCE__SERVER__PORT",
        "WORKFORCE__BROADCAST__DRIVER",
        "WORKFORCE__BROADCAST__TLS",
        "WORKFORCE__REDIS__URL",
        "WORKFORCE__NOTIFICATIONS__TITLES__EVALUATION",
    ];

    fn set_minimal_env() {
        env::set_var("WORKFORCE__AUTH__JWT_SECRET", "test-secret");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("WORKFORCE__SERVER__PORT", "9090");
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("config should load");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.broadcast.driver, BroadcastDriver::Hub);
        assert!(!config.database.is_configured());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_jwt_secret_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn test_redis_driver_requires_url() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("WORKFORCE__BROADCAST__DRIVER", "redis");
        let without_url = AppConfig::load();
        env::set_var("WORKFORCE__REDIS__URL", "redis://localhost:6379");
        let with_url = AppConfig::load();
        clear_env();

        assert_eq!(
            without_url.unwrap().validate(),
            Err(ValidationError::RedisDriverWithoutUrl)
        );
        assert!(with_url.unwrap().validate().is_ok());
    }

    #[test]
    fn test_title_overrides_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("WORKFORCE__NOTIFICATIONS__TITLES__EVALUATION", "Review In");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(
            config.notifications.titles.get("evaluation").map(String::as_str),
            Some("Review In")
        );
    }
}
