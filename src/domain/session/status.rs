//! SessionStatus enum for the staff session lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle status of the staff session.
///
/// Valid transitions:
/// - Initializing -> Authorized | Unauthorized | Error | Initializing
/// - Unauthorized -> Initializing
/// - Authorized -> Unauthorized | Initializing
/// - Error -> Initializing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Initializing,
    Authorized,
    Unauthorized,
    Error,
}

impl SessionStatus {
    /// True while the outcome of the current session is unknown.
    pub fn is_pending(&self) -> bool {
        matches!(self, SessionStatus::Initializing)
    }
}

impl StateMachine for SessionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionStatus::*;
        match self {
            // a second principal may arrive while the first is still verifying
            Initializing => vec![Authorized, Unauthorized, Error, Initializing],
            Unauthorized => vec![Initializing],
            // account switch without an explicit sign-out
            Authorized => vec![Unauthorized, Initializing],
            Error => vec![Initializing],
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::Initializing => "Initializing",
            SessionStatus::Authorized => "Authorized",
            SessionStatus::Unauthorized => "Unauthorized",
            SessionStatus::Error => "Error",
        };
        write!(f, "{}", s)
    }
}
