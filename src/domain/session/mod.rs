//! Session domain - who is signed in and whether they may use the dashboard.
//!
//! - `principal` - identity-provider user and bearer credential
//! - `status` - the session lifecycle state machine
//! - `state` - `SessionState`, the value views observe
//! - `machine` - epoch-guarded transitions applied by the session guard

mod machine;
mod principal;
mod state;
mod status;

pub use machine::{SessionMachine, VerificationOutcome, VerificationTicket, Resolution};
pub use principal::{BearerToken, Principal};
pub use state::{SessionState, ACCESS_DENIED_MESSAGE, VERIFICATION_FAILED_MESSAGE};
pub use status::SessionStatus;
