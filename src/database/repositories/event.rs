//! Event repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::event::{
    CreateEventRequest, Event, EventRegistration, RegistrationStatus, UpdateEventRequest,
};
use crate::utils::errors::AppError;

#[derive(Clone)]
#[derive(Debug)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event
    pub async fn create(&self, request: CreateEventRequest) -> Result<Event, AppError> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (title, description, starts_at, ends_at, location, price_cents, discount_percent, technologies, requirements, prizes, max_participants, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING id, title, description, starts_at, ends_at, location, price_cents, discount_percent, technologies, requirements, prizes, max_participants, is_active, created_by, created_at, updated_at
            "#
        )
        .bind(request.title)
        .bind(request.description)
        .bind(request.starts_at)
        .bind(request.ends_at)
        .bind(request.location)
        .bind(request.price_cents.unwrap_or(0))
        .bind(request.discount_percent.unwrap_or(0))
        .bind(request.technologies.unwrap_or_default())
        .bind(request.requirements.unwrap_or_default())
        .bind(request.prizes.unwrap_or_else(|| serde_json::json!({})))
        .bind(request.max_participants)
        .bind(request.created_by)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Event>, AppError> {
        let event = sqlx::query_as::<_, Event>(
            "SELECT id, title, description, starts_at, ends_at, location, price_cents, discount_percent, technologies, requirements, prizes, max_participants, is_active, created_by, created_at, updated_at FROM events WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Update event
    pub async fn update(&self, id: i64, request: UpdateEventRequest) -> Result<Event, AppError> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                starts_at = COALESCE($4, starts_at),
                ends_at = COALESCE($5, ends_at),
                location = COALESCE($6, location),
                price_cents = COALESCE($7, price_cents),
                discount_percent = COALESCE($8, discount_percent),
                technologies = COALESCE($9, technologies),
                requirements = COALESCE($10, requirements),
                prizes = COALESCE($11, prizes),
                max_participants = COALESCE($12, max_participants),
                is_active = COALESCE($13, is_active),
                updated_at = $14
            WHERE id = $1
            RETURNING id, title, description, starts_at, ends_at, location, price_cents, discount_percent, technologies, requirements, prizes, max_participants, is_active, created_by, created_at, updated_at
            "#
        )
        .bind(id)
        .bind(request.title)
        .bind(request.description)
        .bind(request.starts_at)
        .bind(request.ends_at)
        .bind(request.location)
        .bind(request.price_cents)
        .bind(request.discount_percent)
        .bind(request.technologies)
        .bind(request.requirements)
        .bind(request.prizes)
        .bind(request.max_participants)
        .bind(request.is_active)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Delete event
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List active events, soonest first
    pub async fn list_active(&self) -> Result<Vec<Event>, AppError> {
        let events = sqlx::query_as::<_, Event>(
            "SELECT id, title, description, starts_at, ends_at, location, price_cents, discount_percent, technologies, requirements, prizes, max_participants, is_active, created_by, created_at, updated_at FROM events WHERE is_active = true ORDER BY starts_at ASC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// List all events with pagination, newest first
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Event>, AppError> {
        let events = sqlx::query_as::<_, Event>(
            "SELECT id, title, description, starts_at, ends_at, location, price_cents, discount_percent, technologies, requirements, prizes, max_participants, is_active, created_by, created_at, updated_at FROM events ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Count total events
    pub async fn count(&self) -> Result<i64, AppError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Register a user for an event
    pub async fn register_participant(
        &self,
        event_id: i64,
        user_id: i64,
        status: RegistrationStatus,
    ) -> Result<EventRegistration, AppError> {
        let registration = sqlx::query_as::<_, EventRegistration>(
            r#"
            INSERT INTO event_registrations (event_id, user_id, status, registered_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, event_id, user_id, status, registered_at
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .bind(status.to_string())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Check whether a user is already registered for an event
    pub async fn is_registered(&self, event_id: i64, user_id: i64) -> Result<bool, AppError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM event_registrations WHERE event_id = $1 AND user_id = $2",
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }

    /// Count registrations for an event
    pub async fn get_participant_count(&self, event_id: i64) -> Result<i64, AppError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM event_registrations WHERE event_id = $1 AND status != 'cancelled'",
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Get registrations for an event
    pub async fn get_registrations(&self, event_id: i64) -> Result<Vec<EventRegistration>, AppError> {
        let registrations = sqlx::query_as::<_, EventRegistration>(
            "SELECT id, event_id, user_id, status, registered_at FROM event_registrations WHERE event_id = $1 ORDER BY registered_at ASC"
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(registrations)
    }

    /// Get events a user has registered for
    pub async fn get_user_registrations(&self, user_id: i64) -> Result<Vec<Event>, AppError> {
        let events = sqlx::query_as::<_, Event>(
            r#"
            SELECT e.id, e.title, e.description, e.starts_at, e.ends_at, e.location, e.price_cents, e.discount_percent, e.technologies, e.requirements, e.prizes, e.max_participants, e.is_active, e.created_by, e.created_at, e.updated_at
            FROM events e
            JOIN event_registrations r ON r.event_id = e.id
            WHERE r.user_id = $1 AND r.status != 'cancelled'
            ORDER BY e.starts_at ASC
            "#
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_repository_creation() {
        // This would require a test database setup
        // For now, just test that the repository can be created
        let pool = PgPool::connect("postgresql://test").await;
        if let Ok(pool) = pool {
            let repo = EventRepository::new(pool);
            assert!(!repo.pool.is_closed());
        }
    }
}
