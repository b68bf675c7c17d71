//! CS Rippers backend
//!
//! Backend service for the CS Rippers hackathon and competition platform.
//! This library provides modular components for OTP-verified
//! authentication, event management, leaderboard administration, and
//! theme configuration behind a JSON HTTP API.

pub mod api;
pub mod config;
pub mod database;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{AppError, Result};

// Re-export main components for easy access
pub use api::AppState;
pub use database::DatabaseService;
pub use services::ServiceFactory;
pub use state::{VerificationContext, VerificationStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
