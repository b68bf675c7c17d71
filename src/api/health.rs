//! Health check endpoint

use axum::extract::State;
use axum::Json;

use super::{success, AppState};
use crate::utils::errors::Result;

/// GET /api/health: liveness plus database and Redis health
pub async fn health(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    let database_healthy = state.database.users.count().await.is_ok();
    let services = state.services.health_check().await;

    Ok(success(serde_json::json!({
        "database": database_healthy,
        "redis": services.redis_healthy,
        "mail_enabled": services.mail_enabled,
        "version": crate::VERSION,
    })))
}
