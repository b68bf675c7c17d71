//! Rate limiting middleware
//!
//! This module provides in-process rate limiting for the authentication
//! endpoints, in front of the per-email Redis budget enforced inside the
//! auth service. Clients are keyed by forwarded address where a proxy
//! provides one.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::{debug, warn};

use crate::utils::errors::{AppError, Result};

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per window
    pub max_requests: u32,
    /// Time window duration
    pub window_duration: Duration,
    /// Burst allowance (extra requests allowed in short bursts)
    pub burst_allowance: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window_duration: Duration::from_secs(60),
            burst_allowance: 5,
        }
    }
}

/// Rate limit entry for tracking client requests
#[derive(Debug, Clone)]
struct RateLimitEntry {
    requests: Vec<Instant>,
    burst_used: u32,
    last_reset: Instant,
}

impl RateLimitEntry {
    fn new() -> Self {
        Self {
            requests: Vec::new(),
            burst_used: 0,
            last_reset: Instant::now(),
        }
    }

    /// Clean up old requests outside the window
    fn cleanup(&mut self, window_duration: Duration) {
        let cutoff = Instant::now() - window_duration;
        self.requests.retain(|&time| time > cutoff);

        // Reset burst if enough time has passed
        if self.last_reset.elapsed() > window_duration {
            self.burst_used = 0;
            self.last_reset = Instant::now();
        }
    }

    /// Check if request is allowed
    fn is_allowed(&mut self, config: &RateLimitConfig) -> bool {
        self.cleanup(config.window_duration);

        let current_requests = self.requests.len() as u32;

        // Check if within normal limits
        if current_requests < config.max_requests {
            return true;
        }

        // Check if burst allowance is available
        if self.burst_used < config.burst_allowance {
            self.burst_used += 1;
            return true;
        }

        false
    }

    /// Record a new request
    fn record_request(&mut self) {
        self.requests.push(Instant::now());
    }
}

/// Rate limiting middleware state
#[derive(Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    entries: Arc<Mutex<HashMap<String, RateLimitEntry>>>,
}

impl RateLimiter {
    /// Create a new RateLimiter instance
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Check if a client identifier is within its budget
    pub fn check(&self, identifier: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        let entry = entries
            .entry(identifier.to_string())
            .or_insert_with(RateLimitEntry::new);

        if entry.is_allowed(&self.config) {
            entry.record_request();
            debug!(identifier = %identifier, "Rate limit check passed");
            Ok(())
        } else {
            warn!(identifier = %identifier, "Rate limit exceeded");
            Err(AppError::RateLimitExceeded)
        }
    }

    /// Current request count within the window for an identifier
    pub fn current_requests(&self, identifier: &str) -> u32 {
        let entries = self.entries.lock().unwrap();

        entries
            .get(identifier)
            .map(|entry| {
                let mut entry = entry.clone();
                entry.cleanup(self.config.window_duration);
                entry.requests.len() as u32
            })
            .unwrap_or(0)
    }
}

/// Best-effort client key: proxy-forwarded address, else a shared bucket
fn client_key(request: &Request) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|addr| addr.trim().to_string())
        .unwrap_or_else(|| "direct".to_string())
}

/// Axum middleware applying the limiter to a route group
pub async fn limit_requests(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Result<Response> {
    limiter.check(&client_key(&request))?;

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strict_limiter() -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            max_requests: 2,
            window_duration: Duration::from_secs(60),
            burst_allowance: 1,
        })
    }

    #[test]
    fn test_requests_within_limit_pass() {
        let limiter = strict_limiter();

        assert!(limiter.check("client-a").is_ok());
        assert!(limiter.check("client-a").is_ok());
        assert_eq!(limiter.current_requests("client-a"), 2);
    }

    #[test]
    fn test_burst_then_rejection() {
        let limiter = strict_limiter();

        assert!(limiter.check("client-a").is_ok());
        assert!(limiter.check("client-a").is_ok());
        // Burst allowance absorbs one more
        assert!(limiter.check("client-a").is_ok());
        assert!(limiter.check("client-a").is_err());
    }

    #[test]
    fn test_clients_are_independent() {
        let limiter = strict_limiter();

        assert!(limiter.check("client-a").is_ok());
        assert!(limiter.check("client-a").is_ok());
        assert!(limiter.check("client-b").is_ok());
        assert_eq!(limiter.current_requests("client-b"), 1);
    }

    #[test]
    fn test_client_key_from_forwarded_header() {
        let request = axum::http::Request::builder()
            .uri("/api/login")
            .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
            .body(axum::body::Body::empty())
            .unwrap();

        assert_eq!(client_key(&request), "203.0.113.9");
    }

    #[test]
    fn test_client_key_fallback() {
        let request = axum::http::Request::builder()
            .uri("/api/login")
            .body(axum::body::Body::empty())
            .unwrap();

        assert_eq!(client_key(&request), "direct");
    }
}
