//! Authentication endpoints
//!
//! Handlers for the two-step registration and login flows.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use super::{success, AppState};
use crate::services::RegisterRequest;
use crate::state::VerificationPurpose;
use crate::utils::errors::Result;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub code: String,
    pub purpose: Option<VerificationPurpose>,
}

/// POST /api/register: create an unverified account and email a code
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<serde_json::Value>> {
    let email = crate::utils::helpers::normalize_email(&request.email);
    state.services.auth_service.begin_registration(request).await?;

    Ok(success(serde_json::json!({
        "email": email,
        "message": "Verification code sent",
    })))
}

/// POST /api/login: check the password and email a code
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>> {
    state
        .services
        .auth_service
        .begin_login(&request.email, &request.password)
        .await?;

    Ok(success(serde_json::json!({
        "email": crate::utils::helpers::normalize_email(&request.email),
        "message": "Verification code sent",
    })))
}

/// POST /api/verify-otp: complete a pending flow and issue a session token
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(request): Json<VerifyOtpRequest>,
) -> Result<Json<serde_json::Value>> {
    let auth = &state.services.auth_service;

    let (user, token) = match request.purpose {
        Some(purpose) => auth.verify_otp(&request.email, &request.code, purpose).await?,
        None => auth.verify_otp_any(&request.email, &request.code).await?,
    };

    Ok(success(serde_json::json!({
        "token": token,
        "user": user,
    })))
}
