//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the application and the outside world. Adapters implement these ports.
//!
//! - `IdentityProvider` - sign-in, sign-out, bearer tokens, auth-state notifications
//! - `PreferenceStore` - persisted user preferences (backend environment choice)
//! - `CurrentProfileReader` - the signed-in principal's backend profile

mod current_profile_reader;
mod identity_provider;
mod preference_store;

pub use current_profile_reader::CurrentProfileReader;
pub use identity_provider::{IdentityError, IdentityProvider};
pub use preference_store::{PreferenceError, PreferenceStore};
