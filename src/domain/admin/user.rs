//! User profile types returned by `/users/current` and `/admin/users`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::UserId;

/// Subscription state of an end user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Free,
    Active,
    Expired,
    Cancelled,
    /// Any status this client does not know yet.
    #[serde(other)]
    Unknown,
}

/// A titled set of emotion intensities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionLevel {
    pub title: String,
    #[serde(default)]
    pub emotions: HashMap<String, f64>,
}

/// Model-generated summary of a user's conversations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct UserSummary {
    pub themes_to_avoid: Vec<String>,
    pub potential_trauma_signals: Vec<String>,
    pub communication_style: Vec<String>,
    pub somatic_insights: Vec<String>,
    pub user_character_impression: Option<String>,
    pub personal_themes: Vec<String>,
    pub ideal_support_approach: Vec<String>,
    pub emotions: Vec<EmotionLevel>,
    pub signal: Option<String>,
}

/// Application-level profile of a user, as listed on the admin pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_onboarding: Option<bool>,
    #[serde(default)]
    pub last_image_index: Option<u32>,
    #[serde(default)]
    pub summary: Option<UserSummary>,
    #[serde(default)]
    pub has_used_free_conversation: Option<bool>,
    #[serde(default)]
    pub subscription_status: Option<SubscriptionStatus>,
    #[serde(default)]
    pub subscription_expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_staff: bool,
}

impl UserProfile {
    /// Creates a minimal profile.
    pub fn new(id: UserId, email: impl Into<String>, is_staff: bool) -> Self {
        Self {
            id,
            email: email.into(),
            display_name: None,
            created_at: None,
            completed_onboarding: None,
            last_image_index: None,
            summary: None,
            has_used_free_conversation: None,
            subscription_status: None,
            subscription_expires_at: None,
            is_staff,
        }
    }

    /// Returns the display name, or email as fallback.
    pub fn display_name_or_email(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }

    /// True when the user holds an active paid subscription.
    pub fn has_active_subscription(&self) -> bool {
        self.subscription_status == Some(SubscriptionStatus::Active)
    }
}

/// User profile with activity counts, as shown on the user detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWithCounts {
    #[serde(flatten)]
    pub profile: UserProfile,
    #[serde(default)]
    pub conversations_count: u64,
    #[serde(default)]
    pub meditations_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_minimal_profile_with_staff_flag_defaulting_to_false() {
        let profile: UserProfile =
            serde_json::from_value(json!({"id": "u1", "email": "a@b.c"})).unwrap();

        assert_eq!(profile.id.as_str(), "u1");
        assert!(!profile.is_staff);
        assert!(profile.summary.is_none());
    }

    #[test]
    fn decodes_full_profile() {
        let profile: UserProfile = serde_json::from_value(json!({
            "id": "u2",
            "email": "staff@aurema.app",
            "displayName": "Staff Member",
            "createdAt": "2024-05-01T10:00:00Z",
            "completedOnboarding": true,
            "subscriptionStatus": "active",
            "isStaff": true,
            "summary": {
                "themes_to_avoid": ["work"],
                "emotions": [{"title": "week 1", "emotions": {"calm": 0.7}}]
            },
            "somethingNew": 42
        }))
        .unwrap();

        assert!(profile.is_staff);
        assert!(profile.has_active_subscription());
        assert_eq!(profile.display_name_or_email(), "Staff Member");
        let summary = profile.summary.unwrap();
        assert_eq!(summary.themes_to_avoid, vec!["work".to_string()]);
        assert_eq!(summary.emotions[0].emotions["calm"], 0.7);
    }

    #[test]
    fn unfamiliar_subscription_status_decodes_as_unknown() {
        let profile: UserProfile = serde_json::from_value(json!({
            "id": "u5",
            "email": "u5@example.com",
            "subscriptionStatus": "trialing"
        }))
        .unwrap();

        assert_eq!(profile.subscription_status, Some(SubscriptionStatus::Unknown));
        assert!(!profile.has_active_subscription());
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let profile = UserProfile::new(UserId::new("u3").unwrap(), "x@y.z", false);
        assert_eq!(profile.display_name_or_email(), "x@y.z");
    }

    #[test]
    fn user_with_counts_flattens_profile() {
        let user: UserWithCounts = serde_json::from_value(json!({
            "id": "u4",
            "email": "u4@example.com",
            "conversationsCount": 3,
            "meditationsCount": 1
        }))
        .unwrap();

        assert_eq!(user.profile.id.as_str(), "u4");
        assert_eq!(user.conversations_count, 3);
        assert_eq!(user.meditations_count, 1);
    }

    #[test]
    fn empty_user_id_is_rejected() {
        let result: Result<UserProfile, _> =
            serde_json::from_value(json!({"id": "", "email": "a@b.c"}));
        assert!(result.is_err());
    }
}
