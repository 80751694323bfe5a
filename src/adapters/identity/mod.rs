//! Identity provider adapters.
//!
//! - `FirebaseIdentityProvider` - identity toolkit REST API (production)
//! - `MockIdentityProvider` - in-memory accounts for tests

mod firebase;
mod mock;

pub use firebase::FirebaseIdentityProvider;
pub use mock::MockIdentityProvider;
