//! Domain layer containing the session rules and the admin resource types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (identifiers, errors, state machine trait)
//! - `session` - Principal, session status and the epoch-guarded session machine
//! - `api` - Backend environment selection and the typed API error
//! - `admin` - Users, conversations, meditations, stats and editable paths

pub mod admin;
pub mod api;
pub mod foundation;
pub mod session;
