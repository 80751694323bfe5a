//! EnvironmentSelector - which backend deployment API calls go to.
//!
//! The selection is persisted in the preference store so it survives
//! restarts. Unknown or unreadable values fall back to the configured default.

use std::sync::Arc;

use crate::config::ApiConfig;
use crate::domain::api::ApiEnvironment;
use crate::ports::{PreferenceError, PreferenceStore};

/// Reads and writes the selected deployment and resolves its base URL.
pub struct EnvironmentSelector {
    config: ApiConfig,
    store: Arc<dyn PreferenceStore>,
}

impl EnvironmentSelector {
    pub fn new(config: ApiConfig, store: Arc<dyn PreferenceStore>) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// The persisted selection, else the configured default.
    pub async fn get_environment(&self) -> ApiEnvironment {
        match self.store.get(&self.config.preference_key).await {
            Ok(Some(value)) => match value.parse() {
                Ok(environment) => return environment,
                Err(e) => {
                    tracing::warn!(value = %value, error = %e, "Ignoring persisted API environment");
                }
            },
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Could not read API environment preference");
            }
        }
        self.config.default_environment
    }

    /// Persists `environment` as the selection.
    pub async fn set_environment(&self, environment: ApiEnvironment) -> Result<(), PreferenceError> {
        self.store
            .set(&self.config.preference_key, environment.as_str())
            .await?;
        tracing::info!(environment = %environment, "API environment selected");
        Ok(())
    }

    /// Base URL for `environment` (or the current selection).
    ///
    /// Falls back to the alternate deployment's URL, then to an empty string.
    /// Callers treat an empty result as a configuration error.
    pub async fn resolve_base_url(&self, environment: Option<ApiEnvironment>) -> String {
        let environment = match environment {
            Some(environment) => environment,
            None => self.get_environment().await,
        };

        let selected = self.config.url_for(environment);
        if !selected.is_empty() {
            return selected.to_string();
        }

        let alternate = self.config.url_for(environment.alternate());
        if !alternate.is_empty() {
            tracing::debug!(
                selected = %environment,
                "No URL for selected environment, using alternate"
            );
        }
        alternate.to_string()
    }
}
