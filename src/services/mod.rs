//! Services module
//!
//! This module contains business logic services

pub mod auth;
pub mod event;
pub mod leaderboard;
pub mod mailer;
pub mod redis;
pub mod theme;
pub mod user;

// Re-export commonly used services
pub use auth::{AuthService, Claims, RegisterRequest};
pub use event::EventService;
pub use leaderboard::LeaderboardService;
pub use mailer::{MailRequest, MailStats, MailTemplate, MailerService};
pub use redis::RedisService;
pub use theme::ThemeService;
pub use user::UserService;

use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::state::VerificationStore;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub event_service: EventService,
    pub leaderboard_service: LeaderboardService,
    pub theme_service: ThemeService,
    pub mailer_service: MailerService,
    pub redis_service: RedisService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub async fn new(database: DatabaseService, settings: Settings) -> Result<Self> {
        let redis_service = RedisService::new(settings.clone())?;
        let mailer_service = MailerService::new(settings.clone())?;
        let verification_store = VerificationStore::new(settings.redis.clone()).await?;

        let auth_service = AuthService::new(
            database.users.clone(),
            verification_store,
            mailer_service.clone(),
            redis_service.clone(),
            settings.clone(),
        );
        let user_service = UserService::new(database.users.clone(), settings);
        let event_service = EventService::new(database.clone());
        let leaderboard_service =
            LeaderboardService::new(database.leaderboard.clone(), database.users.clone());
        let theme_service = ThemeService::new(database.themes.clone(), redis_service.clone());

        Ok(Self {
            auth_service,
            user_service,
            event_service,
            leaderboard_service,
            theme_service,
            mailer_service,
            redis_service,
        })
    }

    /// Health check for all services
    pub async fn health_check(&self) -> ServiceHealthStatus {
        let redis_healthy = self.redis_service.health_check().await.unwrap_or(false);
        let mail_enabled = self.mailer_service.is_enabled();

        ServiceHealthStatus {
            redis_healthy,
            mail_enabled,
        }
    }
}

/// Health status for all services
#[derive(Debug, Clone)]
pub struct ServiceHealthStatus {
    pub redis_healthy: bool,
    pub mail_enabled: bool,
}

impl ServiceHealthStatus {
    /// Check if all critical services are healthy
    pub fn is_healthy(&self) -> bool {
        self.redis_healthy
    }

    /// Get list of unhealthy services
    pub fn get_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !self.redis_healthy {
            issues.push("Redis connection failed".to_string());
        }

        issues
    }
}
