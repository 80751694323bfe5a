//! Backend deployment selection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Which admin backend deployment requests are sent to.
///
/// `Production` is the primary target and `Staging` the secondary one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApiEnvironment {
    #[default]
    #[serde(alias = "primary")]
    Production,
    #[serde(alias = "secondary")]
    Staging,
}

impl ApiEnvironment {
    pub const ALL: [ApiEnvironment; 2] = [ApiEnvironment::Production, ApiEnvironment::Staging];

    /// Value stored in the preference store.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiEnvironment::Production => "production",
            ApiEnvironment::Staging => "staging",
        }
    }

    /// The other deployment, used as the base URL fallback.
    pub fn alternate(&self) -> Self {
        match self {
            ApiEnvironment::Production => ApiEnvironment::Staging,
            ApiEnvironment::Staging => ApiEnvironment::Production,
        }
    }
}

impl fmt::Display for ApiEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ApiEnvironment {
    type Err = ValidationError;

    /// Accepts `production`/`primary` and `staging`/`secondary`, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "primary" => Ok(ApiEnvironment::Production),
            "staging" | "secondary" => Ok(ApiEnvironment::Staging),
            other => Err(ValidationError::invalid_format(
                "api_environment",
                format!("unknown environment '{}'", other),
            )),
        }
    }
}
