//! Foundation module - Shared domain primitives.
//!
//! Contains the identifiers, error types and the state machine contract
//! that the session and admin domains build on.

mod errors;
mod ids;
mod state_machine;

pub use errors::ValidationError;
pub use ids::UserId;
pub use state_machine::StateMachine;
