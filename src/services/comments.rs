/*
 * Responsibility
 * - Comments: create / update / delete / get / list by post or author
 * - Optional author-name enrichment for post listings
 */
use chrono::Utc;

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::repos::Store;
use crate::repos::models::{Comment, CommentFilter, CommentPatch, WriteGuard};
use crate::services::object_id::ObjectId;
use crate::services::{settle, users};

/// A comment with the commenting user's name attached (`?withAuthor=true`).
#[derive(Debug, Clone)]
pub struct CommentView {
    pub comment: Comment,
    pub author_name: Option<String>,
}

fn require_content(content: &str) -> Result<(), AppError> {
    if content.trim().is_empty() {
        return Err(AppError::invalid("content is required"));
    }
    Ok(())
}

async fn find(store: &dyn Store, filter: CommentFilter) -> Result<Vec<Comment>, AppError> {
    Ok(store.find_comments(&filter).await?)
}

pub async fn get(store: &dyn Store, id: ObjectId) -> Result<Comment, AppError> {
    store
        .get_comment(id)
        .await?
        .ok_or(AppError::not_found("comment"))
}

pub async fn by_author(store: &dyn Store, author_id: ObjectId) -> Result<Vec<Comment>, AppError> {
    find(
        store,
        CommentFilter {
            author_id: Some(author_id),
            ..CommentFilter::default()
        },
    )
    .await
}

pub async fn by_post(store: &dyn Store, post_id: ObjectId) -> Result<Vec<Comment>, AppError> {
    find(
        store,
        CommentFilter {
            post_id: Some(post_id),
            ..CommentFilter::default()
        },
    )
    .await
}

pub async fn by_post_with_authors(
    store: &dyn Store,
    post_id: ObjectId,
) -> Result<Vec<CommentView>, AppError> {
    let comments = by_post(store, post_id).await?;
    let ids: Vec<ObjectId> = comments.iter().map(|c| c.author_id).collect();
    let names = users::usernames(store, &ids).await?;

    Ok(comments
        .into_iter()
        .map(|comment| CommentView {
            author_name: names.get(&comment.author_id).cloned(),
            comment,
        })
        .collect())
}

pub async fn create(
    store: &dyn Store,
    actor: &AuthCtx,
    post_id: ObjectId,
    content: String,
) -> Result<Comment, AppError> {
    require_content(&content)?;
    if store.get_post(post_id).await?.is_none() {
        return Err(AppError::not_found("post"));
    }

    let comment = Comment {
        id: ObjectId::new(),
        post_id,
        author_id: actor.user_id,
        content,
        created_at: Utc::now(),
    };
    store.insert_comment(&comment).await?;
    tracing::info!(comment_id = %comment.id, post_id = %post_id, "comment created");

    Ok(comment)
}

pub async fn update(
    store: &dyn Store,
    actor: &AuthCtx,
    id: ObjectId,
    content: String,
) -> Result<Comment, AppError> {
    require_content(&content)?;
    let outcome = store
        .update_comment(id, WriteGuard::OwnedBy(actor.user_id), &CommentPatch { content })
        .await?;
    settle(outcome, "comment")
}

pub async fn delete(store: &dyn Store, actor: &AuthCtx, id: ObjectId) -> Result<(), AppError> {
    let outcome = store
        .delete_comment(id, WriteGuard::OwnedBy(actor.user_id))
        .await?;
    settle(outcome, "comment")?;
    tracing::info!(comment_id = %id, "comment deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::MemoryStore;
    use crate::services::posts::{self, NewPost};
    use crate::services::users::NewUser;

    async fn author(store: &MemoryStore, email: &str) -> AuthCtx {
        let user = users::create(
            store,
            NewUser {
                username: email.split('@').next().unwrap_or_default().to_string(),
                email: email.into(),
                password: "pw".into(),
                bio: None,
                profile_picture: None,
            },
        )
        .await
        .unwrap();
        AuthCtx::new(user.id, user.username, false)
    }

    fn assert_send<T: Send>(_: &T) {}

    #[test]
    fn enriched_listing_future_is_send() {
        let store = MemoryStore::new();
        let listing = by_post_with_authors(&store, ObjectId::new());
        assert_send(&listing);
    }

    async fn post(store: &MemoryStore, actor: &AuthCtx) -> ObjectId {
        let draft = NewPost {
            author_id: None,
            title: "t".into(),
            content: "c".into(),
            category: String::new(),
        };
        posts::create(store, actor, draft).await.unwrap().id
    }

    #[tokio::test]
    async fn commenting_on_a_missing_post_is_not_found() {
        let store = MemoryStore::new();
        let ann = author(&store, "ann@example.com").await;
        let err = create(&store, &ann, ObjectId::new(), "hi".into())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { resource: "post" }));
    }

    #[tokio::test]
    async fn blank_content_is_rejected() {
        let store = MemoryStore::new();
        let ann = author(&store, "ann@example.com").await;
        let post_id = post(&store, &ann).await;
        let err = create(&store, &ann, post_id, "  ".into()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn every_comment_gets_its_author_name() {
        let store = MemoryStore::new();
        let ann = author(&store, "ann@example.com").await;
        let bob = author(&store, "bob@example.com").await;
        let post_id = post(&store, &ann).await;

        create(&store, &ann, post_id, "one".into()).await.unwrap();
        create(&store, &ann, post_id, "two".into()).await.unwrap();
        create(&store, &bob, post_id, "three".into()).await.unwrap();

        let views = by_post_with_authors(&store, post_id).await.unwrap();
        let names: Vec<_> = views
            .iter()
            .map(|v| v.author_name.as_deref().unwrap_or("?"))
            .collect();
        assert_eq!(names, ["ann", "ann", "bob"]);
    }

    #[tokio::test]
    async fn only_the_author_can_edit_or_delete() {
        let store = MemoryStore::new();
        let ann = author(&store, "ann@example.com").await;
        let bob = author(&store, "bob@example.com").await;
        let post_id = post(&store, &ann).await;
        let comment = create(&store, &ann, post_id, "hi".into()).await.unwrap();

        let err = update(&store, &bob, comment.id, "edited".into())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let edited = update(&store, &ann, comment.id, "edited".into()).await.unwrap();
        assert_eq!(edited.content, "edited");

        delete(&store, &ann, comment.id).await.unwrap();
        let err = delete(&store, &ann, comment.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
