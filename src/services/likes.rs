/*
 * Responsibility
 * - Likes: create / delete / list by post or user / get one
 * - One like per (post, user), rejected by the store's unique index
 */
use chrono::Utc;

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::repos::Store;
use crate::repos::error::RepoError;
use crate::repos::models::{Like, LikeFilter, WriteGuard};
use crate::services::object_id::ObjectId;
use crate::services::{settle, users};

#[derive(Debug, Clone)]
pub struct LikeView {
    pub like: Like,
    pub username: Option<String>,
}

async fn find(store: &dyn Store, filter: LikeFilter) -> Result<Vec<Like>, AppError> {
    Ok(store.find_likes(&filter).await?)
}

async fn with_usernames(store: &dyn Store, likes: Vec<Like>) -> Result<Vec<LikeView>, AppError> {
    let ids: Vec<ObjectId> = likes.iter().map(|l| l.user_id).collect();
    let names = users::usernames(store, &ids).await?;
    Ok(likes
        .into_iter()
        .map(|like| LikeView {
            username: names.get(&like.user_id).cloned(),
            like,
        })
        .collect())
}

pub async fn by_post(store: &dyn Store, post_id: ObjectId) -> Result<Vec<Like>, AppError> {
    find(
        store,
        LikeFilter {
            post_id: Some(post_id),
            ..LikeFilter::default()
        },
    )
    .await
}

pub async fn by_post_with_users(
    store: &dyn Store,
    post_id: ObjectId,
) -> Result<Vec<LikeView>, AppError> {
    let likes = by_post(store, post_id).await?;
    with_usernames(store, likes).await
}

pub async fn by_user(store: &dyn Store, user_id: ObjectId) -> Result<Vec<Like>, AppError> {
    find(
        store,
        LikeFilter {
            user_id: Some(user_id),
            ..LikeFilter::default()
        },
    )
    .await
}

/// Single like, always with the liker's username.
pub async fn get(store: &dyn Store, id: ObjectId) -> Result<LikeView, AppError> {
    let like = store
        .get_like(id)
        .await?
        .ok_or(AppError::not_found("like"))?;
    let username = store.get_user(like.user_id).await?.map(|u| u.username);
    Ok(LikeView { like, username })
}

pub async fn create(store: &dyn Store, actor: &AuthCtx, post_id: ObjectId) -> Result<Like, AppError> {
    if store.get_post(post_id).await?.is_none() {
        return Err(AppError::not_found("post"));
    }

    let like = Like {
        id: ObjectId::new(),
        post_id,
        user_id: actor.user_id,
        created_at: Utc::now(),
    };
    store.insert_like(&like).await.map_err(|e| match e {
        RepoError::Conflict { .. } => {
            AppError::conflict("ALREADY_LIKED", "this post is already liked by the user")
        }
        other => other.into(),
    })?;
    tracing::info!(like_id = %like.id, post_id = %post_id, user_id = %actor.user_id, "post liked");

    Ok(like)
}

pub async fn delete(store: &dyn Store, actor: &AuthCtx, id: ObjectId) -> Result<(), AppError> {
    let outcome = store
        .delete_like(id, WriteGuard::OwnedBy(actor.user_id))
        .await?;
    settle(outcome, "like")?;
    tracing::info!(like_id = %id, "like removed");
    Ok(())
}
