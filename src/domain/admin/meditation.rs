//! Generated meditation records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meditation {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub audio_url: Option<String>,
    /// Length in seconds.
    #[serde(default)]
    pub duration: Option<f64>,
}

impl Meditation {
    /// Duration rendered as `m:ss`, when known.
    pub fn formatted_duration(&self) -> Option<String> {
        self.duration.map(|secs| {
            let total = secs.max(0.0).round() as u64;
            format!("{}:{:02}", total / 60, total % 60)
        })
    }
}
