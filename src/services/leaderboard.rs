//! Leaderboard service implementation
//!
//! This service handles score mutations, achievement updates, and rank
//! recalculation for the admin leaderboard surface.

use tracing::{debug, info};

use crate::database::repositories::{LeaderboardRepository, UserRepository};
use crate::models::leaderboard::{LeaderboardEntry, RankedEntry};
use crate::utils::errors::{AppError, Result};

/// Leaderboard service for score and rank management
#[derive(Clone)]
#[derive(Debug)]
pub struct LeaderboardService {
    leaderboard_repository: LeaderboardRepository,
    user_repository: UserRepository,
}

impl LeaderboardService {
    /// Create a new LeaderboardService instance
    pub fn new(
        leaderboard_repository: LeaderboardRepository,
        user_repository: UserRepository,
    ) -> Self {
        Self {
            leaderboard_repository,
            user_repository,
        }
    }

    /// List entries with user identity, best score first
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<RankedEntry>> {
        if limit > 100 {
            return Err(AppError::InvalidInput(
                "Limit cannot exceed 100".to_string(),
            ));
        }

        self.leaderboard_repository.list_ranked(limit, offset).await
    }

    /// Get the entry for a single user
    pub async fn get_entry(&self, user_id: i64) -> Result<Option<LeaderboardEntry>> {
        self.leaderboard_repository.find_by_user_id(user_id).await
    }

    /// Set a user's score to an absolute value
    pub async fn set_score(
        &self,
        user_id: i64,
        score: i64,
        admin_id: i64,
    ) -> Result<LeaderboardEntry> {
        self.require_user(user_id).await?;

        if score < 0 {
            return Err(AppError::InvalidInput(
                "Score cannot be negative".to_string(),
            ));
        }

        let entry = self.leaderboard_repository.upsert(user_id, score, None).await?;
        crate::utils::logging::log_admin_action(
            admin_id,
            "set_score",
            Some(&user_id.to_string()),
            Some(&score.to_string()),
        );

        Ok(entry)
    }

    /// Add a (possibly negative) delta to a user's score
    pub async fn adjust_score(
        &self,
        user_id: i64,
        delta: i64,
        admin_id: i64,
    ) -> Result<LeaderboardEntry> {
        self.require_user(user_id).await?;

        let entry = self.leaderboard_repository.adjust_score(user_id, delta).await?;
        crate::utils::logging::log_admin_action(
            admin_id,
            "adjust_score",
            Some(&user_id.to_string()),
            Some(&delta.to_string()),
        );

        Ok(entry)
    }

    /// Replace a user's achievements list
    pub async fn set_achievements(
        &self,
        user_id: i64,
        achievements: Vec<String>,
        admin_id: i64,
    ) -> Result<LeaderboardEntry> {
        self.require_user(user_id).await?;

        if self
            .leaderboard_repository
            .find_by_user_id(user_id)
            .await?
            .is_none()
        {
            // Achievements imply a scoreboard presence.
            self.leaderboard_repository.upsert(user_id, 0, None).await?;
        }

        let entry = self
            .leaderboard_repository
            .set_achievements(user_id, serde_json::json!(achievements))
            .await?;
        crate::utils::logging::log_admin_action(
            admin_id,
            "set_achievements",
            Some(&user_id.to_string()),
            None,
        );

        Ok(entry)
    }

    /// Remove a user's entry
    pub async fn remove_entry(&self, user_id: i64, admin_id: i64) -> Result<()> {
        self.leaderboard_repository.delete_by_user_id(user_id).await?;
        crate::utils::logging::log_admin_action(
            admin_id,
            "remove_leaderboard_entry",
            Some(&user_id.to_string()),
            None,
        );

        Ok(())
    }

    /// Recompute all ranks, returning the number of rows touched
    pub async fn recalculate_ranks(&self, admin_id: i64) -> Result<i64> {
        debug!("Recalculating leaderboard ranks");
        let updated = self.leaderboard_repository.recalculate_ranks().await?;

        info!(admin_id = admin_id, updated = updated, "Leaderboard ranks recalculated");
        Ok(updated)
    }

    async fn require_user(&self, user_id: i64) -> Result<()> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound { user_id })?;

        Ok(())
    }
}
