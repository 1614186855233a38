/*
 * Responsibility
 * - /users and /user/{id}/... handlers
 * - Path ids arrive already parsed (UserIdParam); the actor comes from AuthCtxExtractor
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    api::v1::{
        dto::users::{ChangePasswordRequest, ChangeRoleRequest, UpdateUserRequest, UserResponse},
        extractors::{AuthCtxExtractor, UserIdParam},
    },
    error::AppError,
    services::users,
    state::AppState,
};

pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let rows = users::list(state.store.as_ref()).await?;
    Ok(Json(rows.into_iter().map(UserResponse::from).collect()))
}

pub async fn get_user(
    State(state): State<AppState>,
    user_id: UserIdParam,
) -> Result<Json<UserResponse>, AppError> {
    let user = users::get(state.store.as_ref(), user_id.id).await?;
    Ok(Json(user.into()))
}

pub async fn get_user_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let user = users::get_by_email(state.store.as_ref(), &email).await?;
    Ok(Json(user.into()))
}

pub async fn update_user(
    State(state): State<AppState>,
    AuthCtxExtractor(actor): AuthCtxExtractor,
    user_id: UserIdParam,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    req.validate().map_err(AppError::invalid)?;

    let user = users::update_profile(state.store.as_ref(), &actor, user_id.id, req.into()).await?;
    Ok(Json(user.into()))
}

pub async fn delete_user(
    State(state): State<AppState>,
    AuthCtxExtractor(actor): AuthCtxExtractor,
    user_id: UserIdParam,
) -> Result<StatusCode, AppError> {
    users::delete(state.store.as_ref(), &actor, user_id.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn block_user(
    State(state): State<AppState>,
    user_id: UserIdParam,
) -> Result<Json<UserResponse>, AppError> {
    let user = users::set_blocked(state.store.as_ref(), user_id.id, true).await?;
    Ok(Json(user.into()))
}

pub async fn unblock_user(
    State(state): State<AppState>,
    user_id: UserIdParam,
) -> Result<Json<UserResponse>, AppError> {
    let user = users::set_blocked(state.store.as_ref(), user_id.id, false).await?;
    Ok(Json(user.into()))
}

pub async fn change_password(
    State(state): State<AppState>,
    AuthCtxExtractor(actor): AuthCtxExtractor,
    user_id: UserIdParam,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<StatusCode, AppError> {
    req.validate().map_err(AppError::invalid)?;

    users::change_password(state.store.as_ref(), &actor, user_id.id, req.password).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn change_role(
    State(state): State<AppState>,
    user_id: UserIdParam,
    Json(req): Json<ChangeRoleRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let is_admin = req
        .is_admin
        .ok_or_else(|| AppError::invalid("isAdmin is required"))?;

    let user = users::set_admin(state.store.as_ref(), user_id.id, is_admin).await?;
    Ok(Json(user.into()))
}
