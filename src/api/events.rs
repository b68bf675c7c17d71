//! Public event and theme endpoints

use axum::extract::State;
use axum::{Extension, Json};
use serde::Deserialize;

use super::{success, AppState};
use crate::services::Claims;
use crate::utils::errors::Result;

#[derive(Debug, Deserialize)]
pub struct EventRegistrationRequest {
    pub event_id: i64,
}

/// GET /api/events: active events, soonest first
pub async fn list_events(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    let events = state.services.event_service.list_public_events().await?;

    Ok(success(events))
}

/// POST /api/events: register the authenticated user for an event
pub async fn register_for_event(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<EventRegistrationRequest>,
) -> Result<Json<serde_json::Value>> {
    let registration = state
        .services
        .event_service
        .register(request.event_id, claims.sub)
        .await?;

    Ok(success(registration))
}

/// GET /api/theme: current theme settings for the client render
pub async fn current_theme(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    let theme = state.services.theme_service.get_theme().await?;

    Ok(success(theme))
}
