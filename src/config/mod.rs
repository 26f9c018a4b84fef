//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using
//! the `config` and `dotenvy` crates. Configuration is loaded with the
//! `CONFREG` prefix and nested values use double underscores as
//! separators.
//!
//! # Example
//!
//! ```no_run
//! use confreg::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod activation;
mod database;
mod email;
mod error;
mod payment;
mod redis;
mod revalidation;
mod server;

pub use activation::ActivationConfig;
pub use database::DatabaseConfig;
pub use email::EmailConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use redis::RedisConfig;
pub use revalidation::RevalidationConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Redis configuration (page cache)
    pub redis: RedisConfig,

    /// Payment provider configuration (webhook signing)
    pub payment: PaymentConfig,

    /// Email configuration (Resend)
    pub email: EmailConfig,

    /// Revalidation gateway configuration
    pub revalidation: RevalidationConfig,

    /// Activation token configuration
    pub activation: ActivationConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Loads `.env` if present, then reads variables with the
    /// `CONFREG` prefix, using `__` to separate nested values:
    ///
    /// - `CONFREG__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `CONFREG__DATABASE__URL=...` -> `database.url = ...`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CONFREG")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration sections.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.redis.validate()?;
        self.payment.validate()?;
        self.email.validate()?;
        self.revalidation.validate()?;
        self.activation.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global; serialize these tests.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("CONFREG__DATABASE__URL", "postgresql://test@localhost/conf");
        env::set_var("CONFREG__REDIS__URL", "redis://localhost:6379");
        env::set_var(
            "CONFREG__PAYMENT__WEBHOOK_SECRET",
            "whsec_4f7a9c2e81b3d6f0",
        );
        env::set_var("CONFREG__EMAIL__RESEND_API_KEY", "re_xxx");
        env::set_var("CONFREG__REVALIDATION__SECRET", "c2f9e4a1d8b36705e9c1");
        env::set_var("CONFREG__ACTIVATION__BASE_URL", "https://conf.example");
    }

    fn clear_env() {
        env::remove_var("CONFREG__DATABASE__URL");
        env::remove_var("CONFREG__REDIS__URL");
        env::remove_var("CONFREG__PAYMENT__WEBHOOK_SECRET");
        env::remove_var("CONFREG__EMAIL__RESEND_API_KEY");
        env::remove_var("CONFREG__REVALIDATION__SECRET");
        env::remove_var("CONFREG__ACTIVATION__BASE_URL");
        env::remove_var("CONFREG__SERVER__PORT");
        env::remove_var("CONFREG__SERVER__ENVIRONMENT");
    }

    #[test]
    fn load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.database.url, "postgresql://test@localhost/conf");
        assert_eq!(config.redis.url, "redis://localhost:6379");
    }

    #[test]
    fn full_config_validates() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn server_section_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.activation.ttl_hours, 24);
    }

    #[test]
    fn production_flag_from_env() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("CONFREG__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
    }
}
