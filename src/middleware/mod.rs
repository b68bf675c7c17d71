//! Middleware module
//!
//! This module contains middleware for authentication, rate limiting and
//! request logging.

pub mod auth;
pub mod logging;
pub mod rate_limit;

pub use auth::{require_admin, require_auth};
pub use logging::log_requests;
pub use rate_limit::{limit_requests, RateLimitConfig, RateLimiter};
