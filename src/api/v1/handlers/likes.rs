/*
 * Responsibility
 * - /likes handlers
 */
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};

use crate::{
    api::v1::{
        dto::likes::{CreateLikeRequest, LikeResponse, WithUserQuery},
        extractors::{AuthCtxExtractor, LikeIdParam, PostIdParam, UserIdParam},
    },
    error::AppError,
    services::{likes, object_id::ObjectId},
    state::AppState,
};

pub async fn likes_by_post(
    State(state): State<AppState>,
    post_id: PostIdParam,
    Query(q): Query<WithUserQuery>,
) -> Result<Json<Vec<LikeResponse>>, AppError> {
    let res: Vec<LikeResponse> = if q.with_user {
        likes::by_post_with_users(state.store.as_ref(), post_id.id)
            .await?
            .into_iter()
            .map(LikeResponse::from)
            .collect()
    } else {
        likes::by_post(state.store.as_ref(), post_id.id)
            .await?
            .into_iter()
            .map(LikeResponse::from)
            .collect()
    };
    Ok(Json(res))
}

pub async fn likes_by_user(
    State(state): State<AppState>,
    user_id: UserIdParam,
) -> Result<Json<Vec<LikeResponse>>, AppError> {
    let rows = likes::by_user(state.store.as_ref(), user_id.id).await?;
    Ok(Json(rows.into_iter().map(LikeResponse::from).collect()))
}

pub async fn get_like(
    State(state): State<AppState>,
    like_id: LikeIdParam,
) -> Result<Json<LikeResponse>, AppError> {
    let view = likes::get(state.store.as_ref(), like_id.id).await?;
    Ok(Json(view.into()))
}

pub async fn create_like(
    State(state): State<AppState>,
    AuthCtxExtractor(actor): AuthCtxExtractor,
    Json(req): Json<CreateLikeRequest>,
) -> Result<(StatusCode, Json<LikeResponse>), AppError> {
    req.validate().map_err(AppError::invalid)?;
    let post_id = ObjectId::parse(&req.post_id)?;

    let like = likes::create(state.store.as_ref(), &actor, post_id).await?;
    Ok((StatusCode::CREATED, Json(like.into())))
}

pub async fn delete_like(
    State(state): State<AppState>,
    AuthCtxExtractor(actor): AuthCtxExtractor,
    like_id: LikeIdParam,
) -> Result<StatusCode, AppError> {
    likes::delete(state.store.as_ref(), &actor, like_id.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
