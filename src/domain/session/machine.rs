//! Epoch-guarded session transitions.
//!
//! Every principal presented by the identity provider opens a new epoch and
//! yields a [`VerificationTicket`]. A staff-profile lookup can only resolve the
//! session while its ticket's epoch is still the current one; anything slower
//! than a later sign-in or sign-out is discarded as stale.

use crate::domain::admin::StaffProfile;
use crate::domain::foundation::StateMachine;

use super::{Principal, SessionState, SessionStatus};

/// Proof that a staff lookup was started for a specific session epoch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationTicket {
    epoch: u64,
    principal: Principal,
}

impl VerificationTicket {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }
}

/// Result of looking up the principal's staff profile.
#[derive(Debug, Clone, PartialEq)]
pub enum VerificationOutcome {
    Profile(StaffProfile),
    Failed(String),
}

/// What resolving a ticket did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Authorized,
    /// Not staff; the principal must be signed out at the provider.
    Denied,
    /// Lookup failed; the principal must be signed out at the provider.
    Failed,
    /// A newer session superseded the ticket. Nothing changed.
    Stale,
}

impl Resolution {
    pub fn requires_sign_out(&self) -> bool {
        matches!(self, Resolution::Denied | Resolution::Failed)
    }
}

/// Owner of [`SessionState`] and the session epoch.
#[derive(Debug, Clone, Default)]
pub struct SessionMachine {
    state: SessionState,
    epoch: u64,
}

impl SessionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_current(&self, ticket: &VerificationTicket) -> bool {
        ticket.epoch == self.epoch
    }

    /// The provider reported a signed-in principal.
    pub fn principal_presented(&mut self, principal: Principal) -> VerificationTicket {
        self.epoch += 1;
        self.transition(SessionState::verifying(principal.clone()));
        VerificationTicket {
            epoch: self.epoch,
            principal,
        }
    }

    /// The provider reported no principal.
    ///
    /// Only a present-to-absent change (or the first report at startup)
    /// alters the session; a repeated absence leaves any recorded error intact.
    pub fn principal_absent(&mut self) -> bool {
        let first_report =
            self.state.status() == SessionStatus::Initializing && self.state.principal().is_none();
        if self.state.principal().is_none() && !first_report {
            return false;
        }
        self.epoch += 1;
        self.transition(SessionState::signed_out());
        true
    }

    /// Applies a staff lookup result if the ticket is still current.
    pub fn resolve(&mut self, ticket: &VerificationTicket, outcome: VerificationOutcome) -> Resolution {
        if !self.is_current(ticket) {
            tracing::debug!(
                ticket_epoch = ticket.epoch,
                current_epoch = self.epoch,
                "discarding stale staff verification"
            );
            return Resolution::Stale;
        }

        let profile = match outcome {
            VerificationOutcome::Profile(profile) if profile.id != ticket.principal.uid => {
                tracing::warn!(
                    principal = %ticket.principal.uid,
                    profile = %profile.id,
                    "profile does not belong to the signed-in principal"
                );
                None
            }
            VerificationOutcome::Profile(profile) => Some(profile),
            VerificationOutcome::Failed(reason) => {
                tracing::error!(principal = %ticket.principal.uid, %reason, "staff verification failed");
                None
            }
        };

        // the principal is leaving in both failure cases; later notifications for it are stale
        match profile {
            Some(profile) if profile.is_staff => {
                match SessionState::authorized(ticket.principal.clone(), profile) {
                    Ok(state) => {
                        self.transition(state);
                        Resolution::Authorized
                    }
                    Err(_) => {
                        self.epoch += 1;
                        self.transition(SessionState::failed());
                        Resolution::Failed
                    }
                }
            }
            Some(_) => {
                self.epoch += 1;
                self.transition(SessionState::denied());
                Resolution::Denied
            }
            None => {
                self.epoch += 1;
                self.transition(SessionState::failed());
                Resolution::Failed
            }
        }
    }

    /// Records a user-facing error without changing identity or status.
    pub fn record_error(&mut self, message: impl Into<String>) {
        let state = std::mem::take(&mut self.state);
        self.state = state.with_error(message);
    }

    pub fn clear_error(&mut self) {
        let state = std::mem::take(&mut self.state);
        self.state = state.without_error();
    }

    fn transition(&mut self, next: SessionState) {
        let from = self.state.status();
        let to = next.status();
        if from != to && !from.can_transition_to(&to) {
            tracing::warn!(%from, %to, "unexpected session transition");
        } else if from != to {
            tracing::info!(%from, %to, epoch = self.epoch, "session status changed");
        }
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use crate::domain::session::{ACCESS_DENIED_MESSAGE, VERIFICATION_FAILED_MESSAGE};
    use proptest::prelude::*;

    fn principal(n: u8) -> Principal {
        Principal::new(UserId::new(format!("u{}", n)).unwrap(), format!("u{}@aurema.app", n))
    }

    fn staff(n: u8, is_staff: bool) -> VerificationOutcome {
        VerificationOutcome::Profile(StaffProfile::new(
            UserId::new(format!("u{}", n)).unwrap(),
            format!("u{}@aurema.app", n),
            is_staff,
        ))
    }

    #[test]
    fn first_absence_moves_initializing_to_unauthorized() {
        let mut machine = SessionMachine::new();
        assert!(machine.principal_absent());
        assert_eq!(machine.state().status(), SessionStatus::Unauthorized);
        assert!(!machine.principal_absent());
    }

    #[test]
    fn staff_profile_authorizes() {
        let mut machine = SessionMachine::new();
        let ticket = machine.principal_presented(principal(1));
        assert_eq!(machine.state().status(), SessionStatus::Initializing);

        assert_eq!(machine.resolve(&ticket, staff(1, true)), Resolution::Authorized);
        assert!(machine.state().is_authorized());
        assert_eq!(machine.state().profile().unwrap().email, "u1@aurema.app");
    }

    #[test]
    fn non_staff_profile_is_denied_and_survives_followup_absence() {
        let mut machine = SessionMachine::new();
        let ticket = machine.principal_presented(principal(1));

        let resolution = machine.resolve(&ticket, staff(1, false));
        assert_eq!(resolution, Resolution::Denied);
        assert!(resolution.requires_sign_out());

        // the provider echoes the forced sign-out
        assert!(!machine.principal_absent());
        assert_eq!(machine.state().status(), SessionStatus::Unauthorized);
        assert_eq!(machine.state().error(), Some(ACCESS_DENIED_MESSAGE));
        assert!(machine.state().principal().is_none());
    }

    #[test]
    fn lookup_failure_moves_to_error() {
        let mut machine = SessionMachine::new();
        let ticket = machine.principal_presented(principal(1));

        let resolution = machine.resolve(&ticket, VerificationOutcome::Failed("500".into()));
        assert_eq!(resolution, Resolution::Failed);
        assert_eq!(machine.state().status(), SessionStatus::Error);
        assert_eq!(machine.state().error(), Some(VERIFICATION_FAILED_MESSAGE));
    }

    #[test]
    fn mismatched_profile_is_a_failure() {
        let mut machine = SessionMachine::new();
        let ticket = machine.principal_presented(principal(1));
        assert_eq!(machine.resolve(&ticket, staff(2, true)), Resolution::Failed);
    }

    #[test]
    fn resolution_after_sign_out_is_stale() {
        let mut machine = SessionMachine::new();
        let ticket = machine.principal_presented(principal(1));
        machine.principal_absent();

        assert_eq!(machine.resolve(&ticket, staff(1, true)), Resolution::Stale);
        assert_eq!(machine.state(), &SessionState::signed_out());
    }

    #[test]
    fn older_ticket_cannot_clobber_newer_session() {
        let mut machine = SessionMachine::new();
        let first = machine.principal_presented(principal(1));
        let second = machine.principal_presented(principal(2));

        assert_eq!(machine.resolve(&second, staff(2, true)), Resolution::Authorized);
        assert_eq!(machine.resolve(&first, staff(1, false)), Resolution::Stale);
        assert_eq!(machine.state().principal(), Some(&principal(2)));
        assert!(machine.state().is_authorized());
    }

    #[test]
    fn error_recovers_through_new_sign_in() {
        let mut machine = SessionMachine::new();
        let ticket = machine.principal_presented(principal(1));
        machine.resolve(&ticket, VerificationOutcome::Failed("timeout".into()));

        let retry = machine.principal_presented(principal(1));
        assert_eq!(machine.state().status(), SessionStatus::Initializing);
        assert!(machine.state().error().is_none());
        assert_eq!(machine.resolve(&retry, staff(1, true)), Resolution::Authorized);
    }

    #[test]
    fn record_and_clear_error_keep_status() {
        let mut machine = SessionMachine::new();
        machine.principal_absent();
        machine.record_error("INVALID_LOGIN_CREDENTIALS");
        assert_eq!(machine.state().error(), Some("INVALID_LOGIN_CREDENTIALS"));
        assert_eq!(machine.state().status(), SessionStatus::Unauthorized);
        machine.clear_error();
        assert!(machine.state().error().is_none());
    }

    #[derive(Debug, Clone)]
    enum Event {
        Present(u8),
        Absent,
        Resolve { ticket: usize, outcome: u8 },
    }

    fn event() -> impl Strategy<Value = Event> {
        prop_oneof![
            (0u8..3).prop_map(Event::Present),
            Just(Event::Absent),
            (0usize..8, 0u8..3).prop_map(|(ticket, outcome)| Event::Resolve { ticket, outcome }),
        ]
    }

    proptest! {
        #[test]
        fn authorized_iff_latest_ticket_resolved_as_staff(events in prop::collection::vec(event(), 1..40)) {
            let mut machine = SessionMachine::new();
            let mut tickets: Vec<(VerificationTicket, u8)> = Vec::new();
            let mut current: Option<usize> = None;
            let mut expect_authorized = false;

            for event in events {
                match event {
                    Event::Present(n) => {
                        tickets.push((machine.principal_presented(principal(n)), n));
                        current = Some(tickets.len() - 1);
                        expect_authorized = false;
                    }
                    Event::Absent => {
                        machine.principal_absent();
                        current = None;
                        expect_authorized = false;
                    }
                    Event::Resolve { ticket, outcome } => {
                        if tickets.is_empty() {
                            continue;
                        }
                        let idx = ticket % tickets.len();
                        let (ticket, n) = tickets[idx].clone();
                        let outcome = match outcome {
                            0 => staff(n, true),
                            1 => staff(n, false),
                            _ => VerificationOutcome::Failed("boom".into()),
                        };
                        let before = machine.state().clone();
                        let is_current = current == Some(idx) && machine.is_current(&ticket);
                        let resolution = machine.resolve(&ticket, outcome);

                        if is_current {
                            expect_authorized = resolution == Resolution::Authorized;
                            if resolution != Resolution::Authorized {
                                current = None;
                            }
                        } else {
                            prop_assert_eq!(resolution, Resolution::Stale);
                            prop_assert_eq!(machine.state(), &before);
                        }
                    }
                }

                prop_assert!(machine.state().is_consistent());
                prop_assert_eq!(machine.state().is_authorized(), expect_authorized);
            }
        }
    }
}
