/*
 * Responsibility
 * - POST /register, POST /auth
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::dto::auth::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse},
    error::AppError,
    services::{auth::login::authenticate, users},
    state::AppState,
};

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    req.validate().map_err(AppError::invalid)?;

    let user = users::create(state.store.as_ref(), req.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully",
            user_id: user.id,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    req.validate().map_err(AppError::invalid)?;

    let outcome =
        authenticate(state.store.as_ref(), &state.auth, &req.email, &req.password).await?;

    Ok(Json(LoginResponse {
        token: outcome.token.token,
        user_id: outcome.user.id,
        is_admin: outcome.user.is_admin,
        message: "Login successful",
    }))
}
