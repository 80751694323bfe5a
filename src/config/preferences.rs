//! Preference storage location

use serde::Deserialize;
use std::path::PathBuf;

/// Where user preferences are persisted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreferencesConfig {
    /// Explicit preferences file; defaults to the user's config directory
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl PreferencesConfig {
    /// The preferences file to use.
    ///
    /// Falls back to the working directory when the platform has no
    /// user config directory.
    pub fn resolved_path(&self) -> PathBuf {
        if let Some(path) = &self.path {
            return path.clone();
        }
        dirs::config_dir()
            .map(|dir| dir.join("aurema-admin").join("preferences.json"))
            .unwrap_or_else(|| PathBuf::from(".aurema-admin-preferences.json"))
    }
}
