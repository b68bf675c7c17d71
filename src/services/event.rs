//! Event service implementation
//!
//! This service handles the public event listing, admin event CRUD, and
//! capacity-checked registration.

use tracing::{debug, info};

use crate::database::DatabaseService;
use crate::models::event::{CreateEventRequest, Event, EventRegistration, UpdateEventRequest};
use crate::utils::errors::{AppError, Result};

/// Event service for hackathon and competition management
#[derive(Clone)]
#[derive(Debug)]
pub struct EventService {
    database: DatabaseService,
}

impl EventService {
    /// Create a new EventService instance
    pub fn new(database: DatabaseService) -> Self {
        Self { database }
    }

    /// List active events for the public listing
    pub async fn list_public_events(&self) -> Result<Vec<Event>> {
        debug!("Listing active events");
        self.database.events.list_active().await
    }

    /// List all events for the admin panel
    pub async fn list_all_events(&self, limit: i64, offset: i64) -> Result<Vec<Event>> {
        if limit > 100 {
            return Err(AppError::InvalidInput(
                "Limit cannot exceed 100".to_string(),
            ));
        }

        self.database.events.list(limit, offset).await
    }

    /// Get a single event
    pub async fn get_event(&self, event_id: i64) -> Result<Event> {
        self.database
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(AppError::EventNotFound { event_id })
    }

    /// Create a new event
    pub async fn create_event(&self, request: CreateEventRequest, admin_id: i64) -> Result<Event> {
        self.validate_event_fields(
            &request.title,
            request.starts_at,
            request.ends_at,
            request.discount_percent,
            request.max_participants,
        )?;

        let request = CreateEventRequest {
            created_by: Some(admin_id),
            ..request
        };

        let event = self.database.events.create(request).await?;
        crate::utils::logging::log_event_action(event.id, "create", admin_id, Some(&event.title));

        Ok(event)
    }

    /// Update an existing event
    pub async fn update_event(
        &self,
        event_id: i64,
        request: UpdateEventRequest,
        admin_id: i64,
    ) -> Result<Event> {
        let existing = self.get_event(event_id).await?;

        let starts_at = request.starts_at.unwrap_or(existing.starts_at);
        let ends_at = request.ends_at.unwrap_or(existing.ends_at);
        self.validate_event_fields(
            request.title.as_deref().unwrap_or(&existing.title),
            starts_at,
            ends_at,
            request.discount_percent,
            request.max_participants,
        )?;

        let event = self.database.events.update(event_id, request).await?;
        crate::utils::logging::log_event_action(event_id, "update", admin_id, None);

        Ok(event)
    }

    /// Delete an event and its registrations
    pub async fn delete_event(&self, event_id: i64, admin_id: i64) -> Result<()> {
        // Resolve first so a missing id surfaces as not-found rather than a no-op.
        let event = self.get_event(event_id).await?;

        self.database.events.delete(event.id).await?;
        crate::utils::logging::log_event_action(event_id, "delete", admin_id, Some(&event.title));

        Ok(())
    }

    /// Register a user for an event
    pub async fn register(&self, event_id: i64, user_id: i64) -> Result<EventRegistration> {
        let registration = self.database.register_for_event(event_id, user_id).await?;
        info!(event_id = event_id, user_id = user_id, "User registered for event");

        Ok(registration)
    }

    /// Registrations for an event, for the admin panel
    pub async fn get_registrations(&self, event_id: i64) -> Result<Vec<EventRegistration>> {
        self.get_event(event_id).await?;
        self.database.events.get_registrations(event_id).await
    }

    fn validate_event_fields(
        &self,
        title: &str,
        starts_at: chrono::DateTime<chrono::Utc>,
        ends_at: chrono::DateTime<chrono::Utc>,
        discount_percent: Option<i32>,
        max_participants: Option<i32>,
    ) -> Result<()> {
        if title.trim().len() < 3 {
            return Err(AppError::InvalidInput(
                "Event title must be at least 3 characters".to_string(),
            ));
        }

        if ends_at <= starts_at {
            return Err(AppError::InvalidInput(
                "Event must end after it starts".to_string(),
            ));
        }

        if let Some(discount) = discount_percent {
            if !(0..=100).contains(&discount) {
                return Err(AppError::InvalidInput(
                    "Discount must be between 0 and 100 percent".to_string(),
                ));
            }
        }

        if let Some(cap) = max_participants {
            if cap <= 0 {
                return Err(AppError::InvalidInput(
                    "Participant cap must be greater than 0".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn service() -> EventService {
        let pool = sqlx::PgPool::connect_lazy("postgresql://localhost/test").unwrap();
        EventService::new(DatabaseService::new(pool))
    }

    #[tokio::test]
    async fn test_validate_event_fields() {
        let service = service();
        let now = Utc::now();

        assert!(service
            .validate_event_fields("CTF Sprint", now, now + Duration::hours(8), Some(10), Some(50))
            .is_ok());

        // Title too short
        assert!(service
            .validate_event_fields("ab", now, now + Duration::hours(8), None, None)
            .is_err());

        // Ends before it starts
        assert!(service
            .validate_event_fields("CTF Sprint", now, now - Duration::hours(1), None, None)
            .is_err());

        // Discount out of range
        assert!(service
            .validate_event_fields("CTF Sprint", now, now + Duration::hours(8), Some(101), None)
            .is_err());

        // Zero cap
        assert!(service
            .validate_event_fields("CTF Sprint", now, now + Duration::hours(8), None, Some(0))
            .is_err());
    }
}
