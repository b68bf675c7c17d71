//! Authentication middleware
//!
//! This module provides bearer-token authentication and authorization
//! middleware for protecting the user and admin API surfaces. Verified
//! claims are stored in request extensions for handlers to pick up.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{debug, warn};

use crate::api::AppState;
use crate::services::Claims;
use crate::utils::errors::AppError;

/// Extract the bearer token from the Authorization header
fn bearer_token(request: &Request) -> Result<&str, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

    header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Authentication("Malformed authorization header".to_string()))
}

/// Require a valid bearer token; stores the claims in request extensions
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request)?;
    let claims = state.services.auth_service.verify_token(token)?;

    debug!(user_id = claims.sub, "Request authenticated");
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

/// Require a valid bearer token carrying the admin role
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request)?;
    let claims = state.services.auth_service.verify_token(token)?;

    if !claims.is_admin() {
        warn!(user_id = claims.sub, "Unauthorized admin access attempt");
        return Err(AppError::PermissionDenied(
            "Admin privileges required".to_string(),
        ));
    }

    debug!(admin_id = claims.sub, "Admin request authenticated");
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}
