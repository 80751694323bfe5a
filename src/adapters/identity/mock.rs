//! Mock identity provider for testing.
//!
//! Keeps a table of email/password accounts and publishes auth-state changes
//! on a watch channel like a real provider. Tests can also push arbitrary
//! notifications and inject failures.
//!
//! # Example
//!
//! ```ignore
//! let staff = Principal::new(UserId::new("uid-1")?, "staff@aurema.app");
//! let provider = MockIdentityProvider::new().with_account(staff, "pw");
//! let principal = provider.sign_in("staff@aurema.app", &SecretString::new("pw".into())).await?;
//! let token = provider.id_token(&principal).await?;
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;

use crate::domain::session::{BearerToken, Principal};
use crate::ports::{IdentityError, IdentityProvider};

#[derive(Debug, Clone)]
struct Account {
    password: String,
    principal: Principal,
}

/// In-memory identity provider.
#[derive(Debug)]
pub struct MockIdentityProvider {
    accounts: RwLock<HashMap<String, Account>>,
    auth_state: watch::Sender<Option<Principal>>,
    sign_out_error: RwLock<Option<IdentityError>>,
    token_error: RwLock<Option<IdentityError>>,
    token_failures_remaining: AtomicUsize,
    sign_in_calls: AtomicUsize,
    sign_out_calls: AtomicUsize,
    token_calls: AtomicUsize,
}

impl Default for MockIdentityProvider {
    fn default() -> Self {
        let (auth_state, _) = watch::channel(None);
        Self {
            accounts: RwLock::new(HashMap::new()),
            auth_state,
            sign_out_error: RwLock::new(None),
            token_error: RwLock::new(None),
            token_failures_remaining: AtomicUsize::new(0),
            sign_in_calls: AtomicUsize::new(0),
            sign_out_calls: AtomicUsize::new(0),
            token_calls: AtomicUsize::new(0),
        }
    }
}

impl MockIdentityProvider {
    /// Creates a provider with no accounts and nobody signed in.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account that `sign_in` will accept for the principal's email.
    pub fn with_account(self, principal: Principal, password: impl Into<String>) -> Self {
        self.accounts.write().unwrap().insert(
            principal.email.clone(),
            Account {
                password: password.into(),
                principal,
            },
        );
        self
    }

    /// Starts with `principal` already signed in.
    pub fn signed_in_as(self, principal: Principal) -> Self {
        self.auth_state.send_replace(Some(principal));
        self
    }

    /// Makes every `sign_out` fail with `error`.
    pub fn with_sign_out_error(self, error: IdentityError) -> Self {
        *self.sign_out_error.write().unwrap() = Some(error);
        self
    }

    /// Makes every `id_token` fail with `error`.
    pub fn with_token_error(self, error: IdentityError) -> Self {
        *self.token_error.write().unwrap() = Some(error);
        self
    }

    /// Makes the next `count` token requests fail transiently.
    pub fn fail_next_tokens(&self, count: usize) {
        self.token_failures_remaining.store(count, Ordering::SeqCst);
    }

    /// Clears injected failures.
    pub fn clear_errors(&self) {
        *self.sign_out_error.write().unwrap() = None;
        *self.token_error.write().unwrap() = None;
        self.token_failures_remaining.store(0, Ordering::SeqCst);
    }

    /// Pushes an auth-state notification as the provider would.
    pub fn notify(&self, principal: Option<Principal>) {
        self.auth_state.send_replace(principal);
    }

    /// Simulates the provider losing the session on its own.
    pub fn expire_session(&self) {
        self.notify(None);
    }

    pub fn sign_in_count(&self) -> usize {
        self.sign_in_calls.load(Ordering::SeqCst)
    }

    pub fn sign_out_count(&self) -> usize {
        self.sign_out_calls.load(Ordering::SeqCst)
    }

    pub fn token_request_count(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn sign_in(&self, email: &str, password: &SecretString) -> Result<Principal, IdentityError> {
        self.sign_in_calls.fetch_add(1, Ordering::SeqCst);

        let account = self.accounts.read().unwrap().get(email.trim()).cloned();
        match account {
            Some(account) if account.password == *password.expose_secret() => {
                self.auth_state.send_replace(Some(account.principal.clone()));
                Ok(account.principal)
            }
            _ => Err(IdentityError::InvalidCredentials(
                "INVALID_LOGIN_CREDENTIALS".to_string(),
            )),
        }
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = self.sign_out_error.read().unwrap().clone() {
            return Err(error);
        }
        self.auth_state.send_replace(None);
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Option<Principal>> {
        self.auth_state.subscribe()
    }

    fn current_principal(&self) -> Option<Principal> {
        self.auth_state.borrow().clone()
    }

    async fn id_token(&self, principal: &Principal) -> Result<BearerToken, IdentityError> {
        self.token_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = self.token_error.read().unwrap().clone() {
            return Err(error);
        }
        let remaining = self.token_failures_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.token_failures_remaining.store(remaining - 1, Ordering::SeqCst);
            return Err(IdentityError::Transport("token not ready".to_string()));
        }
        if self.current_principal().as_ref() != Some(principal) {
            return Err(IdentityError::NoSession);
        }
        Ok(BearerToken::new(format!("mock-token-{}", principal.uid)))
    }
}
