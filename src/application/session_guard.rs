//! SessionGuard - keeps the staff session state in step with the identity provider.
//!
//! The guard listens to the provider's auth-state channel for the lifetime of
//! the process. Every time a principal appears it waits for the credential to
//! become usable, fetches the backend profile and decides whether the
//! principal is staff. Non-staff principals and failed verifications are
//! signed out again.
//!
//! State lives in a [`SessionMachine`] behind a mutex. Each verification holds
//! a ticket from the machine; a ticket that is no longer current by the time
//! its fetch returns is discarded, so a slow fetch for an old session never
//! overwrites a newer one.

use std::sync::{Arc, Mutex, PoisonError};

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::SessionConfig;
use crate::domain::api::ApiError;
use crate::domain::session::{
    Principal, Resolution, SessionMachine, SessionState, VerificationOutcome, VerificationTicket,
};
use crate::ports::{CurrentProfileReader, IdentityError, IdentityProvider};

/// Reactive staff session gate.
pub struct SessionGuard {
    inner: Arc<GuardInner>,
    listener: JoinHandle<()>,
}

struct GuardInner {
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn CurrentProfileReader>,
    config: SessionConfig,
    machine: Mutex<SessionMachine>,
    state_tx: watch::Sender<SessionState>,
}

impl SessionGuard {
    /// Subscribes to `identity` and starts tracking the session.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(
        identity: Arc<dyn IdentityProvider>,
        profiles: Arc<dyn CurrentProfileReader>,
        config: SessionConfig,
    ) -> Self {
        let machine = SessionMachine::new();
        let (state_tx, _) = watch::channel(machine.state().clone());
        let auth_state = identity.subscribe();

        let inner = Arc::new(GuardInner {
            identity,
            profiles,
            config,
            machine: Mutex::new(machine),
            state_tx,
        });

        let listener = tokio::spawn(Arc::clone(&inner).listen(auth_state));

        Self { inner, listener }
    }

    /// Receiver that always holds the latest session state.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state_tx.subscribe()
    }

    /// Snapshot of the current session state.
    pub fn state(&self) -> SessionState {
        self.inner.state_tx.borrow().clone()
    }

    /// Waits until the guard has settled on a non-initializing status.
    pub async fn settled(&self) -> SessionState {
        let mut rx = self.subscribe();
        let settled = match rx.wait_for(|state| !state.is_loading()).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        };
        settled
    }

    /// Signs in through the identity provider.
    ///
    /// Returns once the provider accepts the credentials. Staff verification
    /// follows asynchronously through the auth-state channel. Rejections come
    /// back as [`ApiError::IdentityProvider`] carrying the provider's message.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Principal, ApiError> {
        self.inner.update(SessionMachine::clear_error);

        if email.trim().is_empty() || password.expose_secret().is_empty() {
            let error = IdentityError::InvalidCredentials("Email and password are required".into());
            self.inner.update(|machine| machine.record_error(error.to_string()));
            return Err(error.into());
        }

        match self.inner.identity.sign_in(email, password).await {
            Ok(principal) => {
                tracing::info!(uid = %principal.uid, "Sign-in accepted, verifying staff status");
                Ok(principal)
            }
            Err(e) => {
                tracing::info!(error = %e, "Sign-in rejected");
                self.inner.update(|machine| machine.record_error(e.to_string()));
                Err(e.into())
            }
        }
    }

    /// Ends the session at the identity provider.
    pub async fn sign_out(&self) -> Result<(), ApiError> {
        match self.inner.identity.sign_out().await {
            Ok(()) => {
                self.inner.update(|machine| {
                    machine.principal_absent();
                    machine.clear_error();
                });
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Sign-out failed");
                self.inner.update(|machine| machine.record_error(e.to_string()));
                Err(e.into())
            }
        }
    }

    /// Stops listening to the identity provider.
    pub fn shutdown(&self) {
        self.listener.abort();
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

impl GuardInner {
    /// Applies `change` to the machine and publishes the resulting state.
    fn update<R>(&self, change: impl FnOnce(&mut SessionMachine) -> R) -> R {
        let mut machine = self.machine.lock().unwrap_or_else(PoisonError::into_inner);
        let result = change(&mut machine);
        let next = machine.state().clone();
        self.state_tx.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
        result
    }

    async fn listen(self: Arc<Self>, mut auth_state: watch::Receiver<Option<Principal>>) {
        loop {
            let principal = auth_state.borrow_and_update().clone();
            self.on_auth_change(principal);

            if auth_state.changed().await.is_err() {
                tracing::debug!("Identity provider closed its auth-state channel");
                break;
            }
        }
    }

    fn on_auth_change(self: &Arc<Self>, principal: Option<Principal>) {
        match principal {
            Some(principal) => {
                let ticket = self.update(|machine| machine.principal_presented(principal));
                tracing::debug!(uid = %ticket.principal().uid, epoch = ticket.epoch(), "Verifying staff status");
                tokio::spawn(Arc::clone(self).verify(ticket));
            }
            None => {
                self.update(SessionMachine::principal_absent);
            }
        }
    }

    fn is_current(&self, ticket: &VerificationTicket) -> bool {
        self.machine
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_current(ticket)
    }

    /// True while the provider still reports the ticket's principal.
    fn provider_agrees(&self, ticket: &VerificationTicket) -> bool {
        self.identity.current_principal().as_ref() == Some(ticket.principal())
    }

    async fn verify(self: Arc<Self>, ticket: VerificationTicket) {
        if let Err(reason) = self.await_readiness(&ticket).await {
            self.conclude(&ticket, VerificationOutcome::Failed(reason)).await;
            return;
        }

        if !self.is_current(&ticket) {
            tracing::debug!(epoch = ticket.epoch(), "Session changed before profile fetch");
            return;
        }

        let outcome = match self.profiles.current_profile().await {
            Ok(profile) => VerificationOutcome::Profile(profile),
            Err(e) => VerificationOutcome::Failed(e.to_string()),
        };

        // The profile endpoint answers for whoever the provider holds now.
        if !self.provider_agrees(&ticket) {
            tracing::warn!(epoch = ticket.epoch(), "Discarding profile fetched across a principal change");
            return;
        }

        self.conclude(&ticket, outcome).await;
    }

    /// Waits out the stabilization delay, then polls for a bearer credential
    /// with doubling backoff.
    async fn await_readiness(&self, ticket: &VerificationTicket) -> Result<(), String> {
        tokio::time::sleep(self.config.stabilization_delay()).await;

        let attempts = self.config.readiness_attempts.max(1);
        let mut last_error = String::new();
        for attempt in 1..=attempts {
            if !self.is_current(ticket) {
                return Ok(());
            }
            match self.identity.id_token(ticket.principal()).await {
                Ok(_) => return Ok(()),
                Err(e) => {
                    tracing::debug!(attempt, error = %e, "Bearer credential not ready");
                    last_error = e.to_string();
                }
            }
            if attempt < attempts {
                tokio::time::sleep(self.config.backoff_for(attempt)).await;
            }
        }
        Err(last_error)
    }

    async fn conclude(&self, ticket: &VerificationTicket, outcome: VerificationOutcome) {
        let resolution = self.update(|machine| machine.resolve(ticket, outcome));

        match resolution {
            Resolution::Authorized => {
                tracing::info!(uid = %ticket.principal().uid, "Staff session authorized");
            }
            Resolution::Stale => {
                tracing::warn!(epoch = ticket.epoch(), "Discarded stale staff verification");
            }
            Resolution::Denied | Resolution::Failed => {}
        }

        if !resolution.requires_sign_out() || !self.provider_agrees(ticket) {
            return;
        }
        tracing::warn!(
            uid = %ticket.principal().uid,
            ?resolution,
            "Forcing sign-out of unverified principal"
        );
        if let Err(e) = self.identity.sign_out().await {
            tracing::warn!(error = %e, "Forced sign-out failed");
        }
    }
}
