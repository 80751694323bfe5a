//! File-based Preference Store Adapter
//!
//! Keeps preferences as a flat JSON object in a single user-scoped file.
//! The whole file is rewritten on every change.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

use crate::config::PreferencesConfig;
use crate::ports::{PreferenceError, PreferenceStore};

type PreferenceMap = BTreeMap<String, String>;

/// JSON-file storage for preferences
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FilePreferenceStore {
    /// Create a store backed by `path`. The file is created on first write.
    ///
    /// # Example
    /// ```ignore
    /// let store = FilePreferenceStore::new("/home/me/.config/aurema-admin/preferences.json");
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    /// Create a store at the configured (or platform default) location
    pub fn from_config(config: &PreferencesConfig) -> Self {
        Self::new(config.resolved_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_map(&self) -> Result<PreferenceMap, PreferenceError> {
        let json = match fs::read_to_string(&self.path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(PreferenceMap::new()),
            Err(e) => return Err(PreferenceError::Io(e.to_string())),
        };

        if json.trim().is_empty() {
            return Ok(PreferenceMap::new());
        }

        serde_json::from_str(&json).map_err(|e| PreferenceError::Serialization(e.to_string()))
    }

    async fn write_map(&self, map: &PreferenceMap) -> Result<(), PreferenceError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| PreferenceError::Io(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(map)
            .map_err(|e| PreferenceError::Serialization(e.to_string()))?;

        // Replace atomically via a sibling temp file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .await
            .map_err(|e| PreferenceError::Io(e.to_string()))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| PreferenceError::Io(e.to_string()))
    }
}

#[async_trait]
impl PreferenceStore for FilePreferenceStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.read_map().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.read_map().await?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map).await?;
        tracing::debug!(key, path = %self.path.display(), "Preference saved");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), PreferenceError> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.read_map().await?;
        if map.remove(key).is_some() {
            self.write_map(&map).await?;
        }
        Ok(())
    }
}
