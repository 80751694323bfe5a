//! The signed-in principal's profile as read by session gating.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::domain::foundation::UserId;

/// Profile returned by `/users/current`.
///
/// Only the identity fields and `isStaff` are typed. Everything else the
/// backend sends is kept verbatim in `metadata`, so unfamiliar or malformed
/// metadata never blocks the staff check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffProfile {
    pub id: UserId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_optional_string")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub is_staff: bool,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl StaffProfile {
    /// Creates a profile with no metadata.
    pub fn new(id: UserId, email: impl Into<String>, is_staff: bool) -> Self {
        Self {
            id,
            email: email.into(),
            display_name: None,
            is_staff,
            metadata: Map::new(),
        }
    }

    /// Returns the display name, or email as fallback.
    pub fn display_name_or_email(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}

/// Only a literal `true` grants staff access.
fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(lenient_optional_string(deserializer)?.unwrap_or_default())
}

fn lenient_optional_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}
