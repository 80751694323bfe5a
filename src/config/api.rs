//! Admin API configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::api::ApiEnvironment;

/// Base URLs of the admin backend deployments.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Primary (production) backend base URL
    #[serde(default)]
    pub production_url: String,

    /// Secondary (staging) backend base URL
    #[serde(default)]
    pub staging_url: String,

    /// Environment used until the user picks one
    #[serde(default)]
    pub default_environment: ApiEnvironment,

    /// Preference key the user's choice is stored under
    #[serde(default = "default_preference_key")]
    pub preference_key: String,
}

impl ApiConfig {
    /// Configured base URL for `environment` with trailing slashes removed; may be empty.
    pub fn url_for(&self, environment: ApiEnvironment) -> &str {
        let url = match environment {
            ApiEnvironment::Production => &self.production_url,
            ApiEnvironment::Staging => &self.staging_url,
        };
        url.trim().trim_end_matches('/')
    }

    pub fn with_url(mut self, environment: ApiEnvironment, url: impl Into<String>) -> Self {
        match environment {
            ApiEnvironment::Production => self.production_url = url.into(),
            ApiEnvironment::Staging => self.staging_url = url.into(),
        }
        self
    }

    pub fn with_default_environment(mut self, environment: ApiEnvironment) -> Self {
        self.default_environment = environment;
        self
    }

    /// Validate API configuration
    ///
    /// At least one deployment must be configured and every configured URL
    /// must be HTTP(S).
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url_for(ApiEnvironment::Production).is_empty()
            && self.url_for(ApiEnvironment::Staging).is_empty()
        {
            return Err(ValidationError::NoApiUrlConfigured);
        }
        for (environment, name) in [
            (ApiEnvironment::Production, "api.production_url"),
            (ApiEnvironment::Staging, "api.staging_url"),
        ] {
            let url = self.url_for(environment);
            if !url.is_empty() && !is_http_url(url) {
                return Err(ValidationError::InvalidUrl(name));
            }
        }
        if self.preference_key.trim().is_empty() {
            return Err(ValidationError::MissingRequired("api.preference_key"));
        }
        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            production_url: String::new(),
            staging_url: String::new(),
            default_environment: ApiEnvironment::default(),
            preference_key: default_preference_key(),
        }
    }
}

pub(super) fn is_http_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

fn default_preference_key() -> String {
    "admin.apiEnvironment".to_string()
}
