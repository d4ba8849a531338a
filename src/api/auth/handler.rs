//! Auth API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::db::models::{LoginRequest, LoginResponse};
use crate::db::repository::employee;
use crate::utils::{AppError, AppResult};

/// POST /api/auth/login - 员工登录
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let emp = employee::verify_login(&state.pool, &payload.username, &payload.password)
        .await
        .map_err(|_| AppError::invalid_credentials())?;

    let token = state
        .jwt_service
        .generate_token(&emp)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {e}")))?;

    tracing::info!(employee = %emp.username, "Employee logged in");

    Ok(Json(LoginResponse {
        id: emp.id,
        username: emp.username,
        name: emp.name,
        token,
    }))
}
