//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `AUREMA_ADMIN` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use aurema_admin::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod api;
mod error;
mod identity;
mod preferences;
mod session;

pub use api::ApiConfig;
pub use error::{ConfigError, ValidationError};
pub use identity::IdentityConfig;
pub use preferences::PreferencesConfig;
pub use session::SessionConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Admin backend deployments
    #[serde(default)]
    pub api: ApiConfig,

    /// Identity provider (password sign-in, token refresh)
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Session guard timing
    #[serde(default)]
    pub session: SessionConfig,

    /// Preference file location
    #[serde(default)]
    pub preferences: PreferencesConfig,

    /// Log filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON lines instead of human-readable text
    #[serde(default)]
    pub log_json: bool,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `AUREMA_ADMIN` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `AUREMA_ADMIN__API__PRODUCTION_URL=https://...` -> `api.production_url`
    /// - `AUREMA_ADMIN__IDENTITY__API_KEY=...` -> `identity.api_key`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("AUREMA_ADMIN")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.api.validate()?;
        self.identity.validate()?;
        self.session.validate()?;
        if tracing_subscriber::EnvFilter::try_new(&self.log_level).is_err() {
            return Err(ValidationError::InvalidLogFilter(self.log_level.clone()));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            identity: IdentityConfig::default(),
            session: SessionConfig::default(),
            preferences: PreferencesConfig::default(),
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

fn default_log_level() -> String {
    "info,aurema_admin=debug".to_string()
}
