//! Event model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub location: Option<String>,
    pub price_cents: i64,
    pub discount_percent: i32,
    pub technologies: Vec<String>,
    pub requirements: Vec<String>,
    pub prizes: serde_json::Value,
    pub max_participants: Option<i32>,
    pub is_active: bool,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventRegistration {
    pub id: i64,
    pub event_id: i64,
    pub user_id: i64,
    pub status: String,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub location: Option<String>,
    pub price_cents: Option<i64>,
    pub discount_percent: Option<i32>,
    pub technologies: Option<Vec<String>>,
    pub requirements: Option<Vec<String>>,
    pub prizes: Option<serde_json::Value>,
    pub max_participants: Option<i32>,
    pub created_by: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub price_cents: Option<i64>,
    pub discount_percent: Option<i32>,
    pub technologies: Option<Vec<String>>,
    pub requirements: Option<Vec<String>>,
    pub prizes: Option<serde_json::Value>,
    pub max_participants: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Registered,
    Confirmed,
    Cancelled,
    Attended,
}

impl std::fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistrationStatus::Registered => write!(f, "registered"),
            RegistrationStatus::Confirmed => write!(f, "confirmed"),
            RegistrationStatus::Cancelled => write!(f, "cancelled"),
            RegistrationStatus::Attended => write!(f, "attended"),
        }
    }
}

impl Event {
    /// Price after the configured discount, in cents
    pub fn discounted_price_cents(&self) -> i64 {
        let discount = i64::from(self.discount_percent.clamp(0, 100));
        self.price_cents - (self.price_cents * discount) / 100
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event(price_cents: i64, discount_percent: i32) -> Event {
        Event {
            id: 1,
            title: "CTF Sprint".to_string(),
            description: None,
            starts_at: Utc::now(),
            ends_at: Utc::now(),
            location: None,
            price_cents,
            discount_percent,
            technologies: vec![],
            requirements: vec![],
            prizes: serde_json::json!({}),
            max_participants: None,
            is_active: true,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_discounted_price() {
        assert_eq!(sample_event(10_000, 0).discounted_price_cents(), 10_000);
        assert_eq!(sample_event(10_000, 25).discounted_price_cents(), 7_500);
        assert_eq!(sample_event(10_000, 100).discounted_price_cents(), 0);
        // Out-of-range discounts are clamped rather than trusted.
        assert_eq!(sample_event(10_000, 150).discounted_price_cents(), 0);
        assert_eq!(sample_event(10_000, -10).discounted_price_cents(), 10_000);
    }

    #[test]
    fn test_registration_status_display() {
        assert_eq!(RegistrationStatus::Registered.to_string(), "registered");
        assert_eq!(RegistrationStatus::Cancelled.to_string(), "cancelled");
    }
}
