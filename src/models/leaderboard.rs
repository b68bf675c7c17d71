//! Leaderboard model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LeaderboardEntry {
    pub id: i64,
    pub user_id: i64,
    pub score: i64,
    pub rank: i32,
    pub achievements: serde_json::Value,
    pub last_active_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Leaderboard row joined with the user's public identity, for listings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RankedEntry {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub score: i64,
    pub rank: i32,
    pub achievements: serde_json::Value,
    pub last_active_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertEntryRequest {
    pub user_id: i64,
    pub score: i64,
    pub achievements: Option<Vec<String>>,
}

impl LeaderboardEntry {
    /// Achievements as a plain string list, tolerating malformed rows
    pub fn achievement_titles(&self) -> Vec<String> {
        self.achievements
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_achievement_titles() {
        let entry = LeaderboardEntry {
            id: 1,
            user_id: 1,
            score: 100,
            rank: 1,
            achievements: serde_json::json!(["First Blood", "Top 10", 42]),
            last_active_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert_eq!(entry.achievement_titles(), vec!["First Blood", "Top 10"]);
    }

    #[test]
    fn test_achievement_titles_non_array() {
        let entry = LeaderboardEntry {
            id: 1,
            user_id: 1,
            score: 0,
            rank: 0,
            achievements: serde_json::json!({"broken": true}),
            last_active_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(entry.achievement_titles().is_empty());
    }
}
