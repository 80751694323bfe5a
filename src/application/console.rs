//! AdminConsole - wires the adapters and services together.
//!
//! # Example
//!
//! ```ignore
//! let config = AppConfig::load()?;
//! config.validate()?;
//! let console = AdminConsole::from_config(&config)?;
//! console.session().sign_in("staff@aurema.app", &password).await?;
//! let state = console.session().settled().await;
//! if state.is_authorized() {
//!     let stats = console.admin().stats().await?;
//! }
//! ```

use std::sync::Arc;

use thiserror::Error;

use super::{AdminApi, EnvironmentSelector, SessionGuard};
use crate::adapters::http::ApiClient;
use crate::adapters::identity::FirebaseIdentityProvider;
use crate::adapters::preferences::FilePreferenceStore;
use crate::config::{AppConfig, ValidationError};
use crate::domain::api::ApiError;
use crate::ports::{IdentityError, IdentityProvider, PreferenceStore};

/// Failure to assemble the console.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ValidationError),

    #[error("Identity provider setup failed: {0}")]
    Identity(#[from] IdentityError),

    #[error("API client setup failed: {0}")]
    Api(#[from] ApiError),
}

/// Session guard, environment selection and admin API sharing one identity.
pub struct AdminConsole {
    session: SessionGuard,
    environments: Arc<EnvironmentSelector>,
    admin: AdminApi,
}

impl AdminConsole {
    /// Production wiring: identity toolkit provider and a preferences file.
    pub fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        config.validate()?;
        let identity = Arc::new(FirebaseIdentityProvider::new(&config.identity)?);
        let store = Arc::new(FilePreferenceStore::from_config(&config.preferences));
        tracing::debug!(preferences = %store.path().display(), "Using preferences file");
        Self::assemble(config, identity, store)
    }

    /// Wires the console around caller-supplied adapters.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn assemble(
        config: &AppConfig,
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn PreferenceStore>,
    ) -> Result<Self, StartupError> {
        let environments = Arc::new(EnvironmentSelector::new(config.api.clone(), store));
        let client = ApiClient::new(Arc::clone(&identity), Arc::clone(&environments))?;
        let session = SessionGuard::start(
            identity,
            Arc::new(client.clone()),
            config.session.clone(),
        );

        Ok(Self {
            session,
            environments,
            admin: AdminApi::new(client),
        })
    }

    pub fn session(&self) -> &SessionGuard {
        &self.session
    }

    pub fn environments(&self) -> &EnvironmentSelector {
        &self.environments
    }

    pub fn admin(&self) -> &AdminApi {
        &self.admin
    }
}
