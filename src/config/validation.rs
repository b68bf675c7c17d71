//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use super::Settings;
use crate::utils::errors::{AppError, Result};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    validate_redis_config(&settings.redis)?;
    validate_auth_config(&settings.auth)?;
    validate_mailer_config(settings)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate server configuration
fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(AppError::Config("Server host is required".to_string()));
    }

    if config.port == 0 {
        return Err(AppError::Config("Server port must be greater than 0".to_string()));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(AppError::Config("Database URL is required".to_string()));
    }

    if config.max_connections == 0 {
        return Err(AppError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(AppError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

/// Validate Redis configuration
fn validate_redis_config(config: &super::RedisConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(AppError::Config("Redis URL is required".to_string()));
    }

    Ok(())
}

/// Validate authentication configuration
fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if config.jwt_secret.is_empty() {
        return Err(AppError::Config("JWT secret is required".to_string()));
    }

    if config.jwt_secret.len() < 32 {
        return Err(AppError::Config(
            "JWT secret must be at least 32 characters".to_string(),
        ));
    }

    if config.token_ttl_hours <= 0 {
        return Err(AppError::Config(
            "Token TTL must be greater than 0".to_string(),
        ));
    }

    if !(4..=10).contains(&config.otp_length) {
        return Err(AppError::Config(
            "OTP length must be between 4 and 10 digits".to_string(),
        ));
    }

    if config.otp_ttl_seconds < 60 {
        return Err(AppError::Config(
            "OTP TTL must be at least 60 seconds".to_string(),
        ));
    }

    if config.otp_max_attempts == 0 {
        return Err(AppError::Config(
            "OTP max attempts must be greater than 0".to_string(),
        ));
    }

    if config.rate_limit_max_requests == 0 || config.rate_limit_window_seconds == 0 {
        return Err(AppError::Config(
            "Rate limit window and request count must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate mailer configuration
fn validate_mailer_config(settings: &Settings) -> Result<()> {
    let config = &settings.mailer;

    if config.api_url.is_empty() {
        return Err(AppError::Config("Mailer API URL is required".to_string()));
    }

    url::Url::parse(&config.api_url)
        .map_err(|e| AppError::Config(format!("Invalid mailer API URL: {}", e)))?;

    if config.timeout_seconds == 0 {
        return Err(AppError::Config(
            "Mailer timeout must be greater than 0".to_string(),
        ));
    }

    // An API key is only required when delivery is actually enabled.
    if settings.features.email_delivery && config.api_key.is_empty() {
        return Err(AppError::Config(
            "Mailer API key is required when email delivery is enabled".to_string(),
        ));
    }

    if config.sender.is_empty() || !crate::utils::helpers::is_valid_email(&config.sender) {
        return Err(AppError::Config(
            "Mailer sender must be a valid email address".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(AppError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(AppError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.auth.jwt_secret = "0123456789abcdef0123456789abcdef".to_string();
        settings.mailer.api_key = "test-key".to_string();
        settings
    }

    #[test]
    fn test_valid_settings_pass() {
        assert!(validate_settings(&valid_settings()).is_ok());
    }

    #[test]
    fn test_missing_jwt_secret_rejected() {
        let mut settings = valid_settings();
        settings.auth.jwt_secret = String::new();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_short_jwt_secret_rejected() {
        let mut settings = valid_settings();
        settings.auth.jwt_secret = "short".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_missing_api_key_allowed_when_delivery_disabled() {
        let mut settings = valid_settings();
        settings.mailer.api_key = String::new();
        settings.features.email_delivery = false;
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_bad_otp_length_rejected() {
        let mut settings = valid_settings();
        settings.auth.otp_length = 2;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_bad_mailer_url_rejected() {
        let mut settings = valid_settings();
        settings.mailer.api_url = "not a url".to_string();
        assert!(validate_settings(&settings).is_err());
    }
}
