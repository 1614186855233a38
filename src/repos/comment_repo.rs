use async_trait::async_trait;

use crate::repos::error::RepoResult;
use crate::repos::models::{Comment, CommentFilter, CommentPatch, Mutation, WriteGuard};
use crate::services::object_id::ObjectId;

#[async_trait]
pub trait CommentRepo: Send + Sync {
    async fn find_comments(&self, filter: &CommentFilter) -> RepoResult<Vec<Comment>>;

    async fn get_comment(&self, id: ObjectId) -> RepoResult<Option<Comment>>;

    async fn insert_comment(&self, comment: &Comment) -> RepoResult<()>;

    async fn update_comment(
        &self,
        id: ObjectId,
        guard: WriteGuard,
        patch: &CommentPatch,
    ) -> RepoResult<Mutation<Comment>>;

    async fn delete_comment(&self, id: ObjectId, guard: WriteGuard)
    -> RepoResult<Mutation<()>>;
}
