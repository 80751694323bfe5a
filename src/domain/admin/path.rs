//! Guided "paths": editable multi-step content served by `/admin/paths/{id}`.
//!
//! Loading is lenient (the backend may wrap the path in `{"data": ...}` and
//! omit fields); saving is strict and goes through [`PathDraft::to_payload`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::ValidationError;

/// Path the editor opens with.
pub const DEFAULT_PATH_ID: &str = "shadow-work";

/// One step of a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathStep {
    pub index: usize,
    pub name: String,
    pub system_prompt_override: String,
}

/// A path as loaded from the admin API, with absent fields normalized to "".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningPath {
    pub id: String,
    pub name: String,
    pub description: String,
    pub short_description: String,
    pub icon_url: String,
    pub steps: Vec<PathStep>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawStep {
    name: Option<String>,
    system_prompt_override: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawPath {
    name: Option<String>,
    description: Option<String>,
    short_description: Option<String>,
    icon_url: Option<String>,
    steps: Option<Vec<RawStep>>,
}

impl LearningPath {
    /// Normalizes a `GET /admin/paths/{id}` payload.
    ///
    /// The requested `id` wins over any id in the payload.
    pub fn from_payload(id: &str, payload: Value) -> Result<Self, ValidationError> {
        let source = match payload {
            Value::Object(mut map) => match map.remove("data") {
                Some(data) if !data.is_null() => data,
                _ => Value::Object(map),
            },
            Value::Null => Value::Object(Default::default()),
            other => other,
        };

        let raw: RawPath = serde_json::from_value(source)
            .map_err(|e| ValidationError::invalid_format("path", e.to_string()))?;

        Ok(Self {
            id: id.trim().to_string(),
            name: raw.name.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            short_description: raw.short_description.unwrap_or_default(),
            icon_url: raw.icon_url.unwrap_or_default(),
            steps: raw
                .steps
                .unwrap_or_default()
                .into_iter()
                .enumerate()
                .map(|(index, step)| PathStep {
                    index,
                    name: step.name.unwrap_or_default(),
                    system_prompt_override: step.system_prompt_override.unwrap_or_default(),
                })
                .collect(),
        })
    }
}

/// Editable step in a [`PathDraft`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathStepDraft {
    pub name: String,
    pub system_prompt_override: String,
}

/// Editor form state for a path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathDraft {
    pub id: String,
    pub name: String,
    pub description: String,
    pub short_description: String,
    pub icon_url: String,
    pub steps: Vec<PathStepDraft>,
}

/// Body of `PUT /admin/paths/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathPayload {
    pub id: String,
    pub name: String,
    pub description: String,
    pub short_description: String,
    pub icon_url: String,
    pub steps: Vec<PathStep>,
    pub total_steps: usize,
}

impl PathDraft {
    /// Blank form for a path id.
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn add_step(&mut self) {
        self.steps.push(PathStepDraft::default());
    }

    /// Removes the step at `index`; out of range is a no-op.
    pub fn remove_step(&mut self, index: usize) {
        if index < self.steps.len() {
            self.steps.remove(index);
        }
    }

    /// Checks the draft can be saved.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::empty_field("id"));
        }
        if self.id.trim().contains('/') {
            return Err(ValidationError::invalid_format("id", "must not contain '/'"));
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if let Some(index) = self.steps.iter().position(|s| s.name.trim().is_empty()) {
            return Err(ValidationError::empty_field(format!("steps[{}].name", index)));
        }
        Ok(())
    }

    /// Validates and builds the trimmed save payload, re-indexing steps from zero.
    pub fn to_payload(&self) -> Result<PathPayload, ValidationError> {
        self.validate()?;

        let steps: Vec<PathStep> = self
            .steps
            .iter()
            .enumerate()
            .map(|(index, step)| PathStep {
                index,
                name: step.name.trim().to_string(),
                system_prompt_override: step.system_prompt_override.trim().to_string(),
            })
            .collect();

        Ok(PathPayload {
            id: self.id.trim().to_string(),
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            short_description: self.short_description.trim().to_string(),
            icon_url: self.icon_url.trim().to_string(),
            total_steps: steps.len(),
            steps,
        })
    }
}

impl From<LearningPath> for PathDraft {
    fn from(path: LearningPath) -> Self {
        Self {
            id: path.id,
            name: path.name,
            description: path.description,
            short_description: path.short_description,
            icon_url: path.icon_url,
            steps: path
                .steps
                .into_iter()
                .map(|s| PathStepDraft {
                    name: s.name,
                    system_prompt_override: s.system_prompt_override,
                })
                .collect(),
        }
    }
}
