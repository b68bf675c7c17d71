//! Admin panel endpoints
//!
//! Every admin mutation rides the collection's PUT route as an action
//! envelope, so the surface stays at one GET and one PUT per resource.

use axum::extract::{Query, State};
use axum::{Extension, Json};
use serde::Deserialize;

use super::{success, AppState};
use crate::models::event::{CreateEventRequest, UpdateEventRequest};
use crate::models::theme::UpdateThemeRequest;
use crate::models::user::UpdateUserRequest;
use crate::services::Claims;
use crate::utils::errors::{AppError, Result};
use crate::utils::helpers;

const DEFAULT_PAGE_SIZE: i64 = 20;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub search: Option<String>,
}

impl ListQuery {
    fn limit(&self) -> i64 {
        self.per_page.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, 100)
    }

    fn offset(&self) -> i64 {
        helpers::calculate_offset(self.page.unwrap_or(1), self.limit())
    }
}

#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UserAdminAction {
    Update {
        user_id: i64,
        fields: UpdateUserRequest,
    },
    Disable {
        user_id: i64,
    },
    Enable {
        user_id: i64,
    },
    Delete {
        user_id: i64,
    },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EventAdminAction {
    Create {
        event: CreateEventRequest,
    },
    Update {
        event_id: i64,
        fields: UpdateEventRequest,
    },
    Delete {
        event_id: i64,
    },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum LeaderboardAdminAction {
    SetScore { user_id: i64, score: i64 },
    AdjustScore { user_id: i64, delta: i64 },
    SetAchievements { user_id: i64, achievements: Vec<String> },
    Remove { user_id: i64 },
    Recalculate,
}

/// POST /api/admin/auth: password login for the admin panel
pub async fn admin_login(
    State(state): State<AppState>,
    Json(request): Json<AdminLoginRequest>,
) -> Result<Json<serde_json::Value>> {
    let (user, token) = state
        .services
        .auth_service
        .admin_login(&request.email, &request.password)
        .await?;

    Ok(success(serde_json::json!({
        "token": token,
        "user": user,
    })))
}

/// GET /api/admin/auth: validate the presented admin token
pub async fn admin_session(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<serde_json::Value>> {
    let user = state
        .services
        .user_service
        .get_user_by_id(claims.sub)
        .await?
        .ok_or(AppError::UserNotFound { user_id: claims.sub })?;

    Ok(success(serde_json::json!({ "user": user })))
}

/// GET /api/admin/users: paginated listing with optional search
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<serde_json::Value>> {
    let users = match query.search {
        Some(ref pattern) => state.services.user_service.search_users(pattern).await?,
        None => {
            state
                .services
                .user_service
                .list_users(query.limit(), query.offset())
                .await?
        }
    };

    let stats = state.services.user_service.get_user_statistics().await?;

    Ok(success(serde_json::json!({
        "users": users,
        "stats": stats,
    })))
}

/// PUT /api/admin/users: user mutations via the action envelope
pub async fn mutate_users(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(action): Json<UserAdminAction>,
) -> Result<Json<serde_json::Value>> {
    let user_service = &state.services.user_service;

    match action {
        UserAdminAction::Update { user_id, fields } => {
            let user = user_service
                .admin_update_user(user_id, fields, claims.sub)
                .await?;
            Ok(success(user))
        }
        UserAdminAction::Disable { user_id } => {
            let user = user_service
                .set_active_status(user_id, false, claims.sub)
                .await?;
            Ok(success(user))
        }
        UserAdminAction::Enable { user_id } => {
            let user = user_service
                .set_active_status(user_id, true, claims.sub)
                .await?;
            Ok(success(user))
        }
        UserAdminAction::Delete { user_id } => {
            user_service.delete_user(user_id, claims.sub).await?;
            Ok(success(serde_json::json!({ "deleted": user_id })))
        }
    }
}

/// GET /api/admin/events: full event listing for the panel
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<serde_json::Value>> {
    let events = state
        .services
        .event_service
        .list_all_events(query.limit(), query.offset())
        .await?;

    Ok(success(events))
}

/// PUT /api/admin/events: event mutations via the action envelope
pub async fn mutate_events(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(action): Json<EventAdminAction>,
) -> Result<Json<serde_json::Value>> {
    let event_service = &state.services.event_service;

    match action {
        EventAdminAction::Create { event } => {
            let event = event_service.create_event(event, claims.sub).await?;
            Ok(success(event))
        }
        EventAdminAction::Update { event_id, fields } => {
            let event = event_service.update_event(event_id, fields, claims.sub).await?;
            Ok(success(event))
        }
        EventAdminAction::Delete { event_id } => {
            event_service.delete_event(event_id, claims.sub).await?;
            Ok(success(serde_json::json!({ "deleted": event_id })))
        }
    }
}

/// GET /api/admin/leaderboard: ranked listing
pub async fn list_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<serde_json::Value>> {
    let entries = state
        .services
        .leaderboard_service
        .list(query.limit(), query.offset())
        .await?;

    Ok(success(entries))
}

/// PUT /api/admin/leaderboard: score mutations via the action envelope
pub async fn mutate_leaderboard(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(action): Json<LeaderboardAdminAction>,
) -> Result<Json<serde_json::Value>> {
    let leaderboard = &state.services.leaderboard_service;

    match action {
        LeaderboardAdminAction::SetScore { user_id, score } => {
            let entry = leaderboard.set_score(user_id, score, claims.sub).await?;
            Ok(success(entry))
        }
        LeaderboardAdminAction::AdjustScore { user_id, delta } => {
            let entry = leaderboard.adjust_score(user_id, delta, claims.sub).await?;
            Ok(success(entry))
        }
        LeaderboardAdminAction::SetAchievements {
            user_id,
            achievements,
        } => {
            let entry = leaderboard
                .set_achievements(user_id, achievements, claims.sub)
                .await?;
            Ok(success(entry))
        }
        LeaderboardAdminAction::Remove { user_id } => {
            leaderboard.remove_entry(user_id, claims.sub).await?;
            Ok(success(serde_json::json!({ "removed": user_id })))
        }
        LeaderboardAdminAction::Recalculate => {
            let updated = leaderboard.recalculate_ranks(claims.sub).await?;
            Ok(success(serde_json::json!({ "updated": updated })))
        }
    }
}

/// GET /api/admin/themes: current theme settings
pub async fn get_theme(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    let theme = state.services.theme_service.get_theme().await?;

    Ok(success(theme))
}

/// PUT /api/admin/themes: partial theme update
pub async fn update_theme(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<UpdateThemeRequest>,
) -> Result<Json<serde_json::Value>> {
    let theme = state
        .services
        .theme_service
        .update_theme(request, claims.sub)
        .await?;

    Ok(success(theme))
}

/// GET /api/admin/stats: system-wide counters for the panel dashboard
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    let stats = state.database.get_system_stats().await?;

    Ok(success(stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_defaults() {
        let query = ListQuery {
            page: None,
            per_page: None,
            search: None,
        };
        assert_eq!(query.limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn test_list_query_clamps_page_size() {
        let query = ListQuery {
            page: Some(2),
            per_page: Some(500),
            search: None,
        };
        assert_eq!(query.limit(), 100);
        assert_eq!(query.offset(), 100);
    }

    #[test]
    fn test_user_action_deserialization() {
        let action: UserAdminAction =
            serde_json::from_str(r#"{"action": "disable", "user_id": 9}"#).unwrap();
        assert!(matches!(action, UserAdminAction::Disable { user_id: 9 }));

        let action: UserAdminAction = serde_json::from_str(
            r#"{"action": "update", "user_id": 9, "fields": {"name": "New Name"}}"#,
        )
        .unwrap();
        match action {
            UserAdminAction::Update { user_id, fields } => {
                assert_eq!(user_id, 9);
                assert_eq!(fields.name.as_deref(), Some("New Name"));
            }
            other => panic!("unexpected action: {:?}", other),
        }
    }

    #[test]
    fn test_leaderboard_action_deserialization() {
        let action: LeaderboardAdminAction =
            serde_json::from_str(r#"{"action": "recalculate"}"#).unwrap();
        assert!(matches!(action, LeaderboardAdminAction::Recalculate));

        let action: LeaderboardAdminAction =
            serde_json::from_str(r#"{"action": "set_score", "user_id": 3, "score": 250}"#).unwrap();
        assert!(matches!(
            action,
            LeaderboardAdminAction::SetScore { user_id: 3, score: 250 }
        ));
    }

    #[test]
    fn test_unknown_action_rejected() {
        let result: std::result::Result<UserAdminAction, _> =
            serde_json::from_str(r#"{"action": "explode", "user_id": 1}"#);
        assert!(result.is_err());
    }
}
