//! User service implementation
//!
//! This service handles profile management, user lookups, and the
//! moderation actions exposed to the admin panel.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::config::settings::Settings;
use crate::database::repositories::UserRepository;
use crate::models::user::{UpdateUserRequest, User};
use crate::utils::errors::{AppError, Result};
use crate::utils::helpers;

/// User service for managing user operations
#[derive(Clone)]
pub struct UserService {
    user_repository: UserRepository,
    settings: Settings,
}

impl UserService {
    /// Create a new UserService instance
    pub fn new(user_repository: UserRepository, settings: Settings) -> Self {
        Self {
            user_repository,
            settings,
        }
    }

    /// Get user by ID
    pub async fn get_user_by_id(&self, user_id: i64) -> Result<Option<User>> {
        debug!(user_id = user_id, "Getting user by ID");
        self.user_repository.find_by_id(user_id).await
    }

    /// Get user by email
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = helpers::normalize_email(email);
        debug!(email = %email, "Getting user by email");
        self.user_repository.find_by_email(&email).await
    }

    /// Update a user's own profile
    pub async fn update_profile(
        &self,
        user_id: i64,
        update_request: UpdateUserRequest,
    ) -> Result<User> {
        debug!(user_id = user_id, "Updating user profile");

        // Account flags are admin territory, not profile fields.
        let update_request = UpdateUserRequest {
            is_active: None,
            is_verified: None,
            ..update_request
        };

        self.validate_profile_fields(&update_request)?;

        let existing = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound { user_id })?;

        let user = self.user_repository.update(existing.id, update_request).await?;
        info!(user_id = user.id, "User profile updated successfully");

        Ok(user)
    }

    /// Admin update of any user's profile fields
    pub async fn admin_update_user(
        &self,
        user_id: i64,
        update_request: UpdateUserRequest,
        admin_id: i64,
    ) -> Result<User> {
        self.validate_profile_fields(&update_request)?;

        let existing = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound { user_id })?;

        let user = self.user_repository.update(existing.id, update_request).await?;
        crate::utils::logging::log_admin_action(
            admin_id,
            "update_user",
            Some(&user_id.to_string()),
            None,
        );

        Ok(user)
    }

    /// Enable or disable an account
    pub async fn set_active_status(
        &self,
        user_id: i64,
        is_active: bool,
        admin_id: i64,
    ) -> Result<User> {
        let existing = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound { user_id })?;

        let user = self
            .user_repository
            .set_active_status(existing.id, is_active)
            .await?;

        if is_active {
            info!(user_id = user_id, admin_id = admin_id, "User enabled");
        } else {
            warn!(user_id = user_id, admin_id = admin_id, "User disabled");
        }

        Ok(user)
    }

    /// Delete a user account
    pub async fn delete_user(&self, user_id: i64, admin_id: i64) -> Result<()> {
        let existing = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound { user_id })?;

        self.user_repository.delete(existing.id).await?;
        crate::utils::logging::log_admin_action(
            admin_id,
            "delete_user",
            Some(&user_id.to_string()),
            Some(&existing.email),
        );

        Ok(())
    }

    /// List users with pagination
    pub async fn list_users(&self, limit: i64, offset: i64) -> Result<Vec<User>> {
        debug!(limit = limit, offset = offset, "Listing users with pagination");

        if limit > 100 {
            return Err(AppError::InvalidInput(
                "Limit cannot exceed 100".to_string(),
            ));
        }

        self.user_repository.list(limit, offset).await
    }

    /// Search users by name or email
    pub async fn search_users(&self, pattern: &str) -> Result<Vec<User>> {
        debug!(pattern = %pattern, "Searching users");

        if pattern.len() < 2 {
            return Err(AppError::InvalidInput(
                "Search pattern must be at least 2 characters".to_string(),
            ));
        }

        self.user_repository.search(pattern).await
    }

    /// Get user statistics
    pub async fn get_user_statistics(&self) -> Result<HashMap<String, i64>> {
        debug!("Getting user statistics");

        let total_users = self.user_repository.count().await?;
        let disabled_users = self.user_repository.get_disabled_users().await?.len() as i64;

        let mut stats = HashMap::new();
        stats.insert("total_users".to_string(), total_users);
        stats.insert("disabled_users".to_string(), disabled_users);
        stats.insert("active_users".to_string(), total_users - disabled_users);

        Ok(stats)
    }

    /// Reject malformed profile fields before they reach the database
    fn validate_profile_fields(&self, request: &UpdateUserRequest) -> Result<()> {
        if let Some(ref name) = request.name {
            if name.trim().len() < 2 {
                return Err(AppError::InvalidInput(
                    "Name must be at least 2 characters".to_string(),
                ));
            }
        }

        if let Some(ref mobile) = request.mobile {
            if !helpers::is_valid_mobile(mobile) {
                return Err(AppError::InvalidInput("Invalid mobile number".to_string()));
            }
        }

        if let Some(ref photo_url) = request.photo_url {
            url::Url::parse(photo_url)
                .map_err(|_| AppError::InvalidInput("Invalid photo URL".to_string()))?;
        }

        if let Some(ref bio) = request.bio {
            if bio.len() > 500 {
                return Err(AppError::InvalidInput(
                    "Bio cannot exceed 500 characters".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> UserService {
        let pool = sqlx::PgPool::connect_lazy("postgresql://localhost/test").unwrap();
        UserService::new(UserRepository::new(pool), Settings::default())
    }

    #[tokio::test]
    async fn test_validate_profile_fields() {
        let service = service();

        assert!(service
            .validate_profile_fields(&UpdateUserRequest::default())
            .is_ok());

        let bad_name = UpdateUserRequest {
            name: Some("x".to_string()),
            ..Default::default()
        };
        assert!(service.validate_profile_fields(&bad_name).is_err());

        let bad_url = UpdateUserRequest {
            photo_url: Some("not-a-url".to_string()),
            ..Default::default()
        };
        assert!(service.validate_profile_fields(&bad_url).is_err());

        let good = UpdateUserRequest {
            name: Some("Dev".to_string()),
            photo_url: Some("https://cdn.example.com/avatar.png".to_string()),
            mobile: Some("+91 98765 43210".to_string()),
            ..Default::default()
        };
        assert!(service.validate_profile_fields(&good).is_ok());
    }

    #[tokio::test]
    async fn test_long_bio_rejected() {
        let service = service();
        let long_bio = UpdateUserRequest {
            bio: Some("x".repeat(501)),
            ..Default::default()
        };
        assert!(service.validate_profile_fields(&long_bio).is_err());
    }
}
