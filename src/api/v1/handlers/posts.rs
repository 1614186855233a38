/*
 * Responsibility
 * - /posts handlers (queries, calendar filters, owner-only writes)
 * - :id segments are parsed by the PostIdParam extractor (400 when malformed)
 */
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    api::v1::{
        dto::posts::{
            CreatePostRequest, PostFilterQuery, PostResponse, RenamePostRequest,
            UpdatePostRequest,
        },
        extractors::{AuthCtxExtractor, PostIdParam, UserIdParam},
    },
    error::AppError,
    repos::models::Post,
    services::posts,
    state::AppState,
};

fn to_responses(rows: Vec<Post>) -> Json<Vec<PostResponse>> {
    Json(rows.into_iter().map(PostResponse::from).collect())
}

pub async fn list_posts(
    State(state): State<AppState>,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    Ok(to_responses(posts::list_all(state.store.as_ref()).await?))
}

pub async fn get_post(
    State(state): State<AppState>,
    post_id: PostIdParam,
) -> Result<Json<PostResponse>, AppError> {
    let post = posts::get(state.store.as_ref(), post_id.id).await?;
    Ok(Json(post.into()))
}

pub async fn posts_by_author(
    State(state): State<AppState>,
    author_id: UserIdParam,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    Ok(to_responses(
        posts::by_author(state.store.as_ref(), author_id.id).await?,
    ))
}

pub async fn post_by_title(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> Result<Json<PostResponse>, AppError> {
    let post = posts::by_title(state.store.as_ref(), &title).await?;
    Ok(Json(post.into()))
}

pub async fn posts_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    Ok(to_responses(
        posts::by_category(state.store.as_ref(), &category).await?,
    ))
}

pub async fn posts_current_year(
    State(state): State<AppState>,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    Ok(to_responses(posts::current_year(state.store.as_ref()).await?))
}

pub async fn posts_current_month(
    State(state): State<AppState>,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    Ok(to_responses(posts::current_month(state.store.as_ref()).await?))
}

pub async fn posts_by_year_month(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    Ok(to_responses(
        posts::by_year_month(state.store.as_ref(), year, month).await?,
    ))
}

pub async fn filter_posts(
    State(state): State<AppState>,
    Query(q): Query<PostFilterQuery>,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    Ok(to_responses(
        posts::filtered(state.store.as_ref(), q.year, q.month, q.category).await?,
    ))
}

pub async fn create_post(
    State(state): State<AppState>,
    AuthCtxExtractor(actor): AuthCtxExtractor,
    Json(req): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), AppError> {
    req.validate().map_err(AppError::invalid)?;

    let post = posts::create(state.store.as_ref(), &actor, req.into_new_post()?).await?;
    Ok((StatusCode::CREATED, Json(post.into())))
}

pub async fn update_post(
    State(state): State<AppState>,
    AuthCtxExtractor(actor): AuthCtxExtractor,
    post_id: PostIdParam,
    Json(req): Json<UpdatePostRequest>,
) -> Result<Json<PostResponse>, AppError> {
    req.validate().map_err(AppError::invalid)?;

    let post = posts::update(state.store.as_ref(), &actor, post_id.id, req.into()).await?;
    Ok(Json(post.into()))
}

pub async fn rename_post(
    State(state): State<AppState>,
    AuthCtxExtractor(actor): AuthCtxExtractor,
    post_id: PostIdParam,
    Json(req): Json<RenamePostRequest>,
) -> Result<Json<PostResponse>, AppError> {
    req.validate().map_err(AppError::invalid)?;

    let post = posts::rename(state.store.as_ref(), &actor, post_id.id, req.title).await?;
    Ok(Json(post.into()))
}

pub async fn delete_post(
    State(state): State<AppState>,
    AuthCtxExtractor(actor): AuthCtxExtractor,
    post_id: PostIdParam,
) -> Result<StatusCode, AppError> {
    posts::delete(state.store.as_ref(), &actor, post_id.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
