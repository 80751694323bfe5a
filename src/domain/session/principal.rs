//! Identity-provider principal and the bearer credential minted for it.

use secrecy::{ExposeSecret, Secret};
use std::fmt;

use crate::domain::foundation::UserId;

/// The signed-in identity as known to the identity provider.
///
/// Credential refresh stays with the provider; a principal is only the
/// handle used to ask for a fresh [`BearerToken`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub uid: UserId,
    pub email: String,
}

impl Principal {
    pub fn new(uid: UserId, email: impl Into<String>) -> Self {
        Self {
            uid,
            email: email.into(),
        }
    }
}

/// Short-lived token proving the principal's identity to the backend.
#[derive(Clone)]
pub struct BearerToken(Secret<String>);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Secret::new(token.into()))
    }

    /// Value for the `Authorization` header.
    pub fn authorization_value(&self) -> String {
        format!("Bearer {}", self.0.expose_secret())
    }

    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}
