/*
 * Responsibility
 * - /comments handlers
 */
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};

use crate::{
    api::v1::{
        dto::comments::{
            CommentResponse, CreateCommentRequest, UpdateCommentRequest, WithAuthorQuery,
        },
        extractors::{AuthCtxExtractor, CommentIdParam, PostIdParam, UserIdParam},
    },
    error::AppError,
    services::{comments, object_id::ObjectId},
    state::AppState,
};

pub async fn comments_by_author(
    State(state): State<AppState>,
    author_id: UserIdParam,
) -> Result<Json<Vec<CommentResponse>>, AppError> {
    let rows = comments::by_author(state.store.as_ref(), author_id.id).await?;
    Ok(Json(rows.into_iter().map(CommentResponse::from).collect()))
}

pub async fn comments_by_post(
    State(state): State<AppState>,
    post_id: PostIdParam,
    Query(q): Query<WithAuthorQuery>,
) -> Result<Json<Vec<CommentResponse>>, AppError> {
    let res: Vec<CommentResponse> = if q.with_author {
        comments::by_post_with_authors(state.store.as_ref(), post_id.id)
            .await?
            .into_iter()
            .map(CommentResponse::from)
            .collect()
    } else {
        comments::by_post(state.store.as_ref(), post_id.id)
            .await?
            .into_iter()
            .map(CommentResponse::from)
            .collect()
    };
    Ok(Json(res))
}

pub async fn get_comment(
    State(state): State<AppState>,
    comment_id: CommentIdParam,
) -> Result<Json<CommentResponse>, AppError> {
    let comment = comments::get(state.store.as_ref(), comment_id.id).await?;
    Ok(Json(comment.into()))
}

pub async fn create_comment(
    State(state): State<AppState>,
    AuthCtxExtractor(actor): AuthCtxExtractor,
    Json(req): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), AppError> {
    req.validate().map_err(AppError::invalid)?;
    let post_id = ObjectId::parse(&req.post_id)?;

    let comment = comments::create(state.store.as_ref(), &actor, post_id, req.content).await?;
    Ok((StatusCode::CREATED, Json(comment.into())))
}

pub async fn update_comment(
    State(state): State<AppState>,
    AuthCtxExtractor(actor): AuthCtxExtractor,
    comment_id: CommentIdParam,
    Json(req): Json<UpdateCommentRequest>,
) -> Result<Json<CommentResponse>, AppError> {
    req.validate().map_err(AppError::invalid)?;

    let comment =
        comments::update(state.store.as_ref(), &actor, comment_id.id, req.content).await?;
    Ok(Json(comment.into()))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    AuthCtxExtractor(actor): AuthCtxExtractor,
    comment_id: CommentIdParam,
) -> Result<StatusCode, AppError> {
    comments::delete(state.store.as_ref(), &actor, comment_id.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
