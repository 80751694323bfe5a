//! Adapters - Implementations of port interfaces.
//!
//! - `identity` - identity toolkit REST provider and an in-memory mock
//! - `preferences` - JSON-file and in-memory preference stores
//! - `http` - authenticated client for the admin backend

pub mod http;
pub mod identity;
pub mod preferences;
