//! Dashboard overview counters.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: u64,
    pub active_subscriptions: u64,
    pub total_conversations: u64,
    pub conversations_today: u64,
    pub total_meditations: u64,
    pub meditations_today: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_camel_case_counters() {
        let stats: DashboardStats = serde_json::from_value(json!({
            "totalUsers": 120,
            "activeSubscriptions": 30,
            "totalConversations": 900,
            "conversationsToday": 12,
            "totalMeditations": 410,
            "meditationsToday": 5
        }))
        .unwrap();
        assert_eq!(stats.total_users, 120);
        assert_eq!(stats.meditations_today, 5);
    }
}
