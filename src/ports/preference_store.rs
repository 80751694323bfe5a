//! Preference store port - small user-scoped key/value settings.
//!
//! Used to remember which backend deployment the staff user picked.
//! Readers must tolerate missing keys; callers fall back to defaults.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur reading or writing preferences.
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Failed to serialize preferences: {0}")]
    Serialization(String),
}

/// Persisted key/value preferences.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Value stored under `key`, or `None` when never set.
    async fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError>;

    /// Deletes `key`. Missing keys are not an error.
    async fn remove(&self, key: &str) -> Result<(), PreferenceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MapStore(Mutex<HashMap<String, String>>);

    #[async_trait]
    impl PreferenceStore for MapStore {
        async fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
            Ok(self.0.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
            self.0.lock().unwrap().insert(key.into(), value.into());
            Ok(())
        }

        async fn remove(&self, key: &str) -> Result<(), PreferenceError> {
            self.0.lock().unwrap().remove(key);
            Ok(())
        }
    }

    #[tokio::test]
    async fn store_contract_round_trips_and_removes() {
        let store = MapStore(Mutex::new(HashMap::new()));
        assert_eq!(store.get("k").await.unwrap(), None);

        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));

        store.remove("k").await.unwrap();
        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[test]
    fn preference_store_trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn PreferenceStore>();
    }
}
