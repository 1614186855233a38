/*
 * Responsibility
 * - Operations on the likes collection
 * - One like per (post, user): a second insert is RepoError::Conflict
 */
use async_trait::async_trait;

use crate::repos::error::RepoResult;
use crate::repos::models::{Like, LikeFilter, Mutation, WriteGuard};
use crate::services::object_id::ObjectId;

#[async_trait]
pub trait LikeRepo: Send + Sync {
    async fn find_likes(&self, filter: &LikeFilter) -> RepoResult<Vec<Like>>;

    async fn get_like(&self, id: ObjectId) -> RepoResult<Option<Like>>;

    async fn insert_like(&self, like: &Like) -> RepoResult<()>;

    async fn delete_like(&self, id: ObjectId, guard: WriteGuard) -> RepoResult<Mutation<()>>;
}
