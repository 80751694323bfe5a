//! Identity provider port.
//!
//! The provider owns credentials: it verifies email and password, keeps the
//! refresh capability for the signed-in principal, mints short-lived bearer
//! tokens and announces every sign-in and sign-out.
//!
//! # Contract
//!
//! Implementations must:
//! - Publish the new principal on the subscription channel after a successful `sign_in`
//! - Publish `None` after `sign_out` and whenever the provider loses the session
//! - Return `IdentityError::SessionExpired` from `id_token` once the session can no longer be refreshed

use async_trait::async_trait;
use secrecy::SecretString;
use thiserror::Error;
use tokio::sync::watch;

use crate::domain::api::ApiError;
use crate::domain::session::{BearerToken, Principal};

/// Errors reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// Email/password rejected. Carries the provider's message.
    #[error("{0}")]
    InvalidCredentials(String),

    /// The session can no longer be refreshed; the user must sign in again.
    #[error("Session expired")]
    SessionExpired,

    /// Asked for a credential while nobody is signed in.
    #[error("No active session")]
    NoSession,

    /// Any other provider-side rejection.
    #[error("{0}")]
    Provider(String),

    /// The provider could not be reached.
    #[error("Identity provider unreachable: {0}")]
    Transport(String),
}

impl IdentityError {
    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, IdentityError::Transport(_))
    }
}

impl From<IdentityError> for ApiError {
    fn from(error: IdentityError) -> Self {
        ApiError::IdentityProvider(error.to_string())
    }
}

/// Third-party identity provider (sign-in, sign-out, token minting, auth-state notifications).
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verifies credentials and starts a session.
    async fn sign_in(&self, email: &str, password: &SecretString) -> Result<Principal, IdentityError>;

    /// Ends the current session. Succeeds when nobody is signed in.
    async fn sign_out(&self) -> Result<(), IdentityError>;

    /// Auth-state notifications. The receiver starts at the current principal.
    fn subscribe(&self) -> watch::Receiver<Option<Principal>>;

    /// The principal currently signed in, if any.
    fn current_principal(&self) -> Option<Principal>;

    /// A fresh bearer credential for `principal`, refreshing it if needed.
    async fn id_token(&self, principal: &Principal) -> Result<BearerToken, IdentityError>;
}
