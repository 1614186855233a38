/*
 * Responsibility
 * - Operations on the posts collection
 * - Updates/deletes carry a WriteGuard so the ownership check and the write
 *   happen in one store operation
 */
use async_trait::async_trait;

use crate::repos::error::RepoResult;
use crate::repos::models::{Mutation, Post, PostFilter, PostPatch, WriteGuard};
use crate::services::object_id::ObjectId;

#[async_trait]
pub trait PostRepo: Send + Sync {
    // Ordered by creation time (oldest first).
    async fn find_posts(&self, filter: &PostFilter) -> RepoResult<Vec<Post>>;

    async fn get_post(&self, id: ObjectId) -> RepoResult<Option<Post>>;

    async fn insert_post(&self, post: &Post) -> RepoResult<()>;

    async fn update_post(
        &self,
        id: ObjectId,
        guard: WriteGuard,
        patch: &PostPatch,
    ) -> RepoResult<Mutation<Post>>;

    async fn delete_post(&self, id: ObjectId, guard: WriteGuard) -> RepoResult<Mutation<()>>;
}
