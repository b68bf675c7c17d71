//! Authenticated user endpoints

use axum::extract::State;
use axum::{Extension, Json};

use super::{success, AppState};
use crate::models::user::UpdateUserRequest;
use crate::services::Claims;
use crate::utils::errors::Result;

/// GET /api/user/profile: profile with registrations and leaderboard entry
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<serde_json::Value>> {
    let dashboard = state.database.get_user_dashboard(claims.sub).await?;

    Ok(success(dashboard))
}

/// PUT /api/user: partial update of the authenticated user's profile
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<serde_json::Value>> {
    let user = state
        .services
        .user_service
        .update_profile(claims.sub, request)
        .await?;

    Ok(success(user))
}
