//! Theme settings model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Process-wide visual configuration, stored as a single row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ThemeSettings {
    pub id: i32,
    pub wallpaper_url: Option<String>,
    pub accent_color: String,
    pub background_color: String,
    pub dark_mode: bool,
    pub animations_enabled: bool,
    pub updated_by: Option<i64>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateThemeRequest {
    pub wallpaper_url: Option<String>,
    pub accent_color: Option<String>,
    pub background_color: Option<String>,
    pub dark_mode: Option<bool>,
    pub animations_enabled: Option<bool>,
}

impl UpdateThemeRequest {
    /// True when the request carries no change at all
    pub fn is_empty(&self) -> bool {
        self.wallpaper_url.is_none()
            && self.accent_color.is_none()
            && self.background_color.is_none()
            && self.dark_mode.is_none()
            && self.animations_enabled.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_is_empty() {
        assert!(UpdateThemeRequest::default().is_empty());

        let update = UpdateThemeRequest {
            dark_mode: Some(false),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
