//! Error handling for CS Rippers
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Main error type for the CS Rippers application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Mail delivery error: {0}")]
    Mail(#[from] MailError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: i64 },

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: i64 },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is disabled")]
    AccountDisabled,

    #[error("No pending verification for this email")]
    OtpExpired,

    #[error("Incorrect verification code ({attempts_remaining} attempts remaining)")]
    OtpMismatch { attempts_remaining: u32 },

    #[error("Event has reached maximum participants")]
    EventFull,

    #[error("Already registered for this event")]
    AlreadyRegistered,

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Password hash error: {0}")]
    PasswordHash(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Email provider specific errors
#[derive(Error, Debug)]
pub enum MailError {
    #[error("Mail API request failed: {0}")]
    RequestFailed(String),

    #[error("Mail API timeout")]
    Timeout,

    #[error("Invalid mail API response: {0}")]
    InvalidResponse(String),

    #[error("Mail service unavailable")]
    ServiceUnavailable,

    #[error("Unknown mail template: {0}")]
    UnknownTemplate(String),
}

/// Result type alias for CS Rippers operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for mail operations
pub type MailResult<T> = std::result::Result<T, MailError>;

impl AppError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Database(_) => false,
            AppError::Migration(_) => false,
            AppError::Mail(_) => true,
            AppError::Config(_) => false,
            AppError::PermissionDenied(_) => false,
            AppError::UserNotFound { .. } => false,
            AppError::EventNotFound { .. } => false,
            AppError::InvalidCredentials => false,
            AppError::AccountDisabled => false,
            AppError::OtpExpired => false,
            AppError::OtpMismatch { .. } => true,
            AppError::EventFull => false,
            AppError::AlreadyRegistered => false,
            AppError::Redis(_) => true,
            AppError::Http(_) => true,
            AppError::Serialization(_) => false,
            AppError::Io(_) => true,
            AppError::UrlParse(_) => false,
            AppError::Token(_) => false,
            AppError::PasswordHash(_) => false,
            AppError::Authentication(_) => false,
            AppError::RateLimitExceeded => true,
            AppError::InvalidInput(_) => false,
            AppError::ServiceUnavailable(_) => true,
        }
    }

    /// HTTP status code this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::UserNotFound { .. } | AppError::EventNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::InvalidCredentials
            | AppError::OtpExpired
            | AppError::OtpMismatch { .. }
            | AppError::Token(_)
            | AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::PermissionDenied(_) | AppError::AccountDisabled => StatusCode::FORBIDDEN,
            AppError::EventFull | AppError::AlreadyRegistered => StatusCode::CONFLICT,
            AppError::InvalidInput(_) | AppError::Serialization(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            AppError::ServiceUnavailable(_) | AppError::Mail(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::Database(_) => ErrorSeverity::Critical,
            AppError::Migration(_) => ErrorSeverity::Critical,
            AppError::Config(_) => ErrorSeverity::Critical,
            AppError::PermissionDenied(_) => ErrorSeverity::Warning,
            AppError::Authentication(_) => ErrorSeverity::Warning,
            AppError::InvalidCredentials => ErrorSeverity::Warning,
            AppError::RateLimitExceeded => ErrorSeverity::Warning,
            AppError::InvalidInput(_) => ErrorSeverity::Info,
            AppError::OtpMismatch { .. } => ErrorSeverity::Info,
            AppError::OtpExpired => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internal failures are logged in full but never leaked to the client.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Internal error while handling request");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = serde_json::json!({
            "success": false,
            "error": message,
        });

        (status, Json(body)).into_response()
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
