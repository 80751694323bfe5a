//! Identity provider configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::api::is_http_url;
use super::error::ValidationError;

/// ID tokens live for an hour; a larger margin would refresh on every call.
pub const MAX_REFRESH_MARGIN_SECS: u64 = 3600;

/// Firebase-compatible identity provider settings
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    /// Web API key of the identity project
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Identity toolkit base URL (password sign-in)
    #[serde(default = "default_identity_url")]
    pub identity_url: String,

    /// Secure token base URL (refresh-token exchange)
    #[serde(default = "default_token_url")]
    pub token_url: String,

    /// Refresh the ID token when it expires within this many seconds
    #[serde(default = "default_refresh_margin")]
    pub refresh_margin_secs: u64,
}

impl IdentityConfig {
    pub fn refresh_margin(&self) -> Duration {
        Duration::from_secs(self.refresh_margin_secs)
    }

    /// Validate identity configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let has_key = self
            .api_key
            .as_ref()
            .map(|k| !k.expose_secret().trim().is_empty())
            .unwrap_or(false);
        if !has_key {
            return Err(ValidationError::MissingRequired("identity.api_key"));
        }
        if !is_http_url(&self.identity_url) {
            return Err(ValidationError::InvalidUrl("identity.identity_url"));
        }
        if !is_http_url(&self.token_url) {
            return Err(ValidationError::InvalidUrl("identity.token_url"));
        }
        if self.refresh_margin_secs > MAX_REFRESH_MARGIN_SECS {
            return Err(ValidationError::RefreshMarginTooLarge {
                max: MAX_REFRESH_MARGIN_SECS,
            });
        }
        Ok(())
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            identity_url: default_identity_url(),
            token_url: default_token_url(),
            refresh_margin_secs: default_refresh_margin(),
        }
    }
}

fn default_identity_url() -> String {
    "https://identitytoolkit.googleapis.com/v1".to_string()
}

fn default_token_url() -> String {
    "https://securetoken.googleapis.com/v1".to_string()
}

fn default_refresh_margin() -> u64 {
    300
}
