//! Preference store adapters.
//!
//! - `FilePreferenceStore` - JSON file in the user's config directory
//! - `InMemoryPreferenceStore` - for tests and ephemeral sessions

mod file_preference_store;
mod in_memory_preference_store;

pub use file_preference_store::FilePreferenceStore;
pub use in_memory_preference_store::InMemoryPreferenceStore;
