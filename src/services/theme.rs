//! Theme service implementation
//!
//! This service serves the singleton theme settings with a short Redis
//! cache in front of the database row, invalidated on every update.

use tracing::{debug, warn};

use crate::database::repositories::ThemeRepository;
use crate::models::theme::{ThemeSettings, UpdateThemeRequest};
use crate::services::redis::RedisService;
use crate::utils::errors::{AppError, Result};
use crate::utils::helpers;

/// Cache key under the configured Redis prefix
const THEME_CACHE_KEY: &str = "theme:current";
/// The theme changes rarely but is read on every client render
const THEME_CACHE_TTL_SECONDS: u64 = 60;

/// Theme service for the admin-managed visual configuration
#[derive(Clone)]
#[derive(Debug)]
pub struct ThemeService {
    theme_repository: ThemeRepository,
    redis_service: RedisService,
}

impl ThemeService {
    /// Create a new ThemeService instance
    pub fn new(theme_repository: ThemeRepository, redis_service: RedisService) -> Self {
        Self {
            theme_repository,
            redis_service,
        }
    }

    /// Get the current theme settings, preferring the cache
    pub async fn get_theme(&self) -> Result<ThemeSettings> {
        match self.redis_service.get::<ThemeSettings>(THEME_CACHE_KEY).await {
            Ok(Some(cached)) => {
                debug!("Theme settings served from cache");
                return Ok(cached);
            }
            Ok(None) => {}
            Err(e) => {
                // A cache miss is not worth failing the request over.
                warn!(error = %e, "Theme cache read failed, falling back to database");
            }
        }

        let settings = self
            .theme_repository
            .get()
            .await?
            .ok_or_else(|| AppError::Config("Theme settings row is missing".to_string()))?;

        if let Err(e) = self
            .redis_service
            .set(THEME_CACHE_KEY, &settings, Some(THEME_CACHE_TTL_SECONDS))
            .await
        {
            warn!(error = %e, "Failed to cache theme settings");
        }

        Ok(settings)
    }

    /// Apply a partial update and invalidate the cache
    pub async fn update_theme(
        &self,
        request: UpdateThemeRequest,
        admin_id: i64,
    ) -> Result<ThemeSettings> {
        if request.is_empty() {
            return Err(AppError::InvalidInput(
                "Theme update carries no changes".to_string(),
            ));
        }

        self.validate_theme_fields(&request)?;

        let settings = self.theme_repository.update(request, Some(admin_id)).await?;

        if let Err(e) = self.redis_service.delete(THEME_CACHE_KEY).await {
            warn!(error = %e, "Failed to invalidate theme cache");
        }

        crate::utils::logging::log_admin_action(admin_id, "update_theme", None, None);
        Ok(settings)
    }

    fn validate_theme_fields(&self, request: &UpdateThemeRequest) -> Result<()> {
        if let Some(ref wallpaper_url) = request.wallpaper_url {
            url::Url::parse(wallpaper_url)
                .map_err(|_| AppError::InvalidInput("Invalid wallpaper URL".to_string()))?;
        }

        if let Some(ref accent) = request.accent_color {
            if !helpers::is_valid_hex_color(accent) {
                return Err(AppError::InvalidInput(
                    "Accent color must be a hex value like #22c55e".to_string(),
                ));
            }
        }

        if let Some(ref background) = request.background_color {
            if !helpers::is_valid_hex_color(background) {
                return Err(AppError::InvalidInput(
                    "Background color must be a hex value like #0a0a0a".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    fn service() -> ThemeService {
        let pool = sqlx::PgPool::connect_lazy("postgresql://localhost/test").unwrap();
        ThemeService::new(
            ThemeRepository::new(pool),
            RedisService::new(Settings::default()).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_validate_theme_fields() {
        let service = service();

        let good = UpdateThemeRequest {
            wallpaper_url: Some("https://cdn.example.com/wall.png".to_string()),
            accent_color: Some("#22c55e".to_string()),
            background_color: Some("#000".to_string()),
            ..Default::default()
        };
        assert!(service.validate_theme_fields(&good).is_ok());

        let bad_color = UpdateThemeRequest {
            accent_color: Some("green".to_string()),
            ..Default::default()
        };
        assert!(service.validate_theme_fields(&bad_color).is_err());

        let bad_url = UpdateThemeRequest {
            wallpaper_url: Some("not a url".to_string()),
            ..Default::default()
        };
        assert!(service.validate_theme_fields(&bad_url).is_err());
    }
}
