//! Test data helpers for creating test objects
//!
//! This module provides helper functions for building test settings,
//! users, and request payloads.

use chrono::{Duration, Utc};

use cs_rippers::config::Settings;
use cs_rippers::models::event::CreateEventRequest;
use cs_rippers::models::user::{User, UserRole};

/// Settings suitable for tests: no real mail delivery, fixed secret
pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.auth.jwt_secret = "test-secret-test-secret-test-secret!".to_string();
    settings.auth.otp_ttl_seconds = 300;
    settings.auth.otp_max_attempts = 3;
    settings.features.email_delivery = false;
    settings.redis.prefix = "csrippers-test:".to_string();
    settings
}

/// Settings pointing the mailer at a mock provider URL
pub fn test_settings_with_mailer(api_url: &str) -> Settings {
    let mut settings = test_settings();
    settings.features.email_delivery = true;
    settings.mailer.api_url = api_url.to_string();
    settings.mailer.api_key = "test-api-key".to_string();
    settings
}

/// Helper function to create a test user
pub fn create_test_user(id: i64, email: &str, role: UserRole) -> User {
    User {
        id,
        email: email.to_string(),
        name: "Test User".to_string(),
        mobile: Some("+91 98765 43210".to_string()),
        role,
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$placeholder$placeholder".to_string(),
        is_verified: true,
        is_active: true,
        photo_url: None,
        bio: None,
        location: Some("Pune".to_string()),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Helper function to create a test event request
pub fn create_test_event_request(title: &str, max_participants: Option<i32>) -> CreateEventRequest {
    let starts_at = Utc::now() + Duration::days(7);
    CreateEventRequest {
        title: title.to_string(),
        description: Some("A 24 hour build sprint".to_string()),
        starts_at,
        ends_at: starts_at + Duration::hours(24),
        location: Some("Online".to_string()),
        price_cents: Some(49_900),
        discount_percent: Some(10),
        technologies: Some(vec!["rust".to_string(), "postgres".to_string()]),
        requirements: Some(vec!["laptop".to_string()]),
        prizes: Some(serde_json::json!({
            "first": "₹50,000",
            "second": "₹25,000",
            "third": "₹10,000",
        })),
        max_participants,
        created_by: None,
    }
}
