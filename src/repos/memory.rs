//! In-memory document store.
//!
//! Every collection lives behind one `RwLock`, so uniqueness checks and
//! guarded writes run under the same write lock as the mutation itself.
//! Used when no database is configured and by the test suites.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::repos::error::{LIKES_POST_USER_KEY, RepoError, RepoResult, USERS_EMAIL_KEY};
use crate::repos::models::{
    Comment, CommentFilter, CommentPatch, Like, LikeFilter, Mutation, Post, PostFilter, PostPatch,
    User, UserPatch, WriteGuard,
};
use crate::repos::{CommentRepo, LikeRepo, PostRepo, Store, UserRepo};
use crate::services::object_id::ObjectId;

#[derive(Debug, Default)]
struct Collections {
    users: BTreeMap<ObjectId, User>,
    posts: BTreeMap<ObjectId, Post>,
    comments: BTreeMap<ObjectId, Comment>,
    likes: BTreeMap<ObjectId, Like>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Collections>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn close(&self) {}
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn list_users(&self) -> RepoResult<Vec<User>> {
        Ok(self.inner.read().await.users.values().cloned().collect())
    }

    async fn get_user(&self, id: ObjectId) -> RepoResult<Option<User>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let c = self.inner.read().await;
        Ok(c.users.values().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, user: &User) -> RepoResult<()> {
        let mut c = self.inner.write().await;
        if c.users.values().any(|u| u.email == user.email) {
            return Err(RepoError::conflict(USERS_EMAIL_KEY));
        }
        c.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update_user(&self, id: ObjectId, patch: &UserPatch) -> RepoResult<Option<User>> {
        let mut c = self.inner.write().await;
        if let Some(email) = &patch.email
            && c.users.values().any(|u| u.id != id && &u.email == email)
        {
            return Err(RepoError::conflict(USERS_EMAIL_KEY));
        }
        let Some(user) = c.users.get_mut(&id) else {
            return Ok(None);
        };
        patch.apply(user);
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: ObjectId) -> RepoResult<bool> {
        Ok(self.inner.write().await.users.remove(&id).is_some())
    }
}

#[async_trait]
impl PostRepo for MemoryStore {
    async fn find_posts(&self, filter: &PostFilter) -> RepoResult<Vec<Post>> {
        let c = self.inner.read().await;
        let mut posts: Vec<Post> = c
            .posts
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        posts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(posts)
    }

    async fn get_post(&self, id: ObjectId) -> RepoResult<Option<Post>> {
        Ok(self.inner.read().await.posts.get(&id).cloned())
    }

    async fn insert_post(&self, post: &Post) -> RepoResult<()> {
        self.inner.write().await.posts.insert(post.id, post.clone());
        Ok(())
    }

    async fn update_post(
        &self,
        id: ObjectId,
        guard: WriteGuard,
        patch: &PostPatch,
    ) -> RepoResult<Mutation<Post>> {
        let mut c = self.inner.write().await;
        let Some(post) = c.posts.get_mut(&id) else {
            return Ok(Mutation::NotFound);
        };
        if !guard.permits(post.author_id) {
            return Ok(Mutation::NotOwner);
        }
        patch.apply(post);
        Ok(Mutation::Done(post.clone()))
    }

    async fn delete_post(&self, id: ObjectId, guard: WriteGuard) -> RepoResult<Mutation<()>> {
        let mut c = self.inner.write().await;
        let owner = match c.posts.get(&id) {
            Some(post) => post.author_id,
            None => return Ok(Mutation::NotFound),
        };
        if !guard.permits(owner) {
            return Ok(Mutation::NotOwner);
        }
        c.posts.remove(&id);
        Ok(Mutation::Done(()))
    }
}

#[async_trait]
impl CommentRepo for MemoryStore {
    async fn find_comments(&self, filter: &CommentFilter) -> RepoResult<Vec<Comment>> {
        let c = self.inner.read().await;
        let mut comments: Vec<Comment> = c
            .comments
            .values()
            .filter(|cm| filter.matches(cm))
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(comments)
    }

    async fn get_comment(&self, id: ObjectId) -> RepoResult<Option<Comment>> {
        Ok(self.inner.read().await.comments.get(&id).cloned())
    }

    async fn insert_comment(&self, comment: &Comment) -> RepoResult<()> {
        self.inner
            .write()
            .await
            .comments
            .insert(comment.id, comment.clone());
        Ok(())
    }

    async fn update_comment(
        &self,
        id: ObjectId,
        guard: WriteGuard,
        patch: &CommentPatch,
    ) -> RepoResult<Mutation<Comment>> {
        let mut c = self.inner.write().await;
        let Some(comment) = c.comments.get_mut(&id) else {
            return Ok(Mutation::NotFound);
        };
        if !guard.permits(comment.author_id) {
            return Ok(Mutation::NotOwner);
        }
        patch.apply(comment);
        Ok(Mutation::Done(comment.clone()))
    }

    async fn delete_comment(
        &self,
        id: ObjectId,
        guard: WriteGuard,
    ) -> RepoResult<Mutation<()>> {
        let mut c = self.inner.write().await;
        let owner = match c.comments.get(&id) {
            Some(comment) => comment.author_id,
            None => return Ok(Mutation::NotFound),
        };
        if !guard.permits(owner) {
            return Ok(Mutation::NotOwner);
        }
        c.comments.remove(&id);
        Ok(Mutation::Done(()))
    }
}

#[async_trait]
impl LikeRepo for MemoryStore {
    async fn find_likes(&self, filter: &LikeFilter) -> RepoResult<Vec<Like>> {
        let c = self.inner.read().await;
        let mut likes: Vec<Like> = c
            .likes
            .values()
            .filter(|l| filter.matches(l))
            .cloned()
            .collect();
        likes.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(likes)
    }

    async fn get_like(&self, id: ObjectId) -> RepoResult<Option<Like>> {
        Ok(self.inner.read().await.likes.get(&id).cloned())
    }

    async fn insert_like(&self, like: &Like) -> RepoResult<()> {
        let mut c = self.inner.write().await;
        if c
            .likes
            .values()
            .any(|l| l.post_id == like.post_id && l.user_id == like.user_id)
        {
            return Err(RepoError::conflict(LIKES_POST_USER_KEY));
        }
        c.likes.insert(like.id, like.clone());
        Ok(())
    }

    async fn delete_like(&self, id: ObjectId, guard: WriteGuard) -> RepoResult<Mutation<()>> {
        let mut c = self.inner.write().await;
        let owner = match c.likes.get(&id) {
            Some(like) => like.user_id,
            None => return Ok(Mutation::NotFound),
        };
        if !guard.permits(owner) {
            return Ok(Mutation::NotOwner);
        }
        c.likes.remove(&id);
        Ok(Mutation::Done(()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::repos::models::DateRange;

    fn user(email: &str) -> User {
        let now = Utc::now();
        User {
            id: ObjectId::new(),
            username: email.split('@').next().unwrap_or_default().to_string(),
            email: email.to_string(),
            password: "secret".into(),
            bio: None,
            profile_picture: None,
            created_at: now,
            updated_at: now,
            is_admin: false,
            is_active: true,
            is_blocked: false,
        }
    }

    fn post(author_id: ObjectId, created_at: chrono::DateTime<Utc>, category: &str) -> Post {
        Post {
            id: ObjectId::new(),
            author_id,
            title: "t".into(),
            content: "c".into(),
            category: category.into(),
            created_at,
            updated_at: created_at,
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict_and_keeps_the_first_user() {
        let store = MemoryStore::new();
        let first = user("a@example.com");
        store.insert_user(&first).await.unwrap();

        let mut second = user("a@example.com");
        second.username = "impostor".into();
        let err = store.insert_user(&second).await.unwrap_err();
        assert!(matches!(err, RepoError::Conflict { .. }));

        let stored = store.get_user_by_email("a@example.com").await.unwrap().unwrap();
        assert_eq!(stored.id, first.id);
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn changing_email_to_a_taken_one_is_a_conflict() {
        let store = MemoryStore::new();
        let a = user("a@example.com");
        let b = user("b@example.com");
        store.insert_user(&a).await.unwrap();
        store.insert_user(&b).await.unwrap();

        let patch = UserPatch {
            email: Some("a@example.com".into()),
            ..UserPatch::at(Utc::now())
        };
        assert!(matches!(
            store.update_user(b.id, &patch).await,
            Err(RepoError::Conflict { .. })
        ));

        // Re-saving your own email is fine.
        let patch = UserPatch {
            email: Some("b@example.com".into()),
            ..UserPatch::at(Utc::now())
        };
        assert!(store.update_user(b.id, &patch).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn guarded_delete_reports_owner_mismatch_and_missing() {
        let store = MemoryStore::new();
        let owner = ObjectId::new();
        let stranger = ObjectId::new();
        let p = post(owner, Utc::now(), "");
        store.insert_post(&p).await.unwrap();

        assert_eq!(
            store.delete_post(p.id, WriteGuard::OwnedBy(stranger)).await.unwrap(),
            Mutation::NotOwner
        );
        assert!(store.get_post(p.id).await.unwrap().is_some());

        assert_eq!(
            store.delete_post(p.id, WriteGuard::OwnedBy(owner)).await.unwrap(),
            Mutation::Done(())
        );
        assert_eq!(
            store.delete_post(p.id, WriteGuard::OwnedBy(owner)).await.unwrap(),
            Mutation::NotFound
        );
    }

    #[tokio::test]
    async fn second_like_of_the_same_post_is_a_conflict() {
        let store = MemoryStore::new();
        let post_id = ObjectId::new();
        let user_id = ObjectId::new();
        let like = |id| Like {
            id,
            post_id,
            user_id,
            created_at: Utc::now(),
        };
        store.insert_like(&like(ObjectId::new())).await.unwrap();
        assert!(matches!(
            store.insert_like(&like(ObjectId::new())).await,
            Err(RepoError::Conflict { .. })
        ));
        let found = store
            .find_likes(&LikeFilter {
                post_id: Some(post_id),
                user_id: None,
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn post_filter_combines_range_and_category() {
        let store = MemoryStore::new();
        let author = ObjectId::new();
        let april = Utc.with_ymd_and_hms(2024, 4, 10, 12, 0, 0).unwrap();
        let may = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        store.insert_post(&post(author, april, "rust")).await.unwrap();
        store.insert_post(&post(author, april, "go")).await.unwrap();
        store.insert_post(&post(author, may, "rust")).await.unwrap();

        let filter = PostFilter {
            category: Some("rust".into()),
            created: Some(DateRange {
                start: Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap(),
                end: may,
            }),
            ..PostFilter::default()
        };
        let found = store.find_posts(&filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].created_at, april);
        assert_eq!(found[0].category, "rust");
    }
}
