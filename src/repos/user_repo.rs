/*
 * Responsibility
 * - Operations on the users collection
 * - Email uniqueness is the store's job: insert/update return RepoError::Conflict
 */
use async_trait::async_trait;

use crate::repos::error::RepoResult;
use crate::repos::models::{User, UserPatch};
use crate::services::object_id::ObjectId;

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn list_users(&self) -> RepoResult<Vec<User>>;

    async fn get_user(&self, id: ObjectId) -> RepoResult<Option<User>>;

    async fn get_user_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    async fn insert_user(&self, user: &User) -> RepoResult<()>;

    // Returns None when no user has this id.
    async fn update_user(&self, id: ObjectId, patch: &UserPatch) -> RepoResult<Option<User>>;

    async fn delete_user(&self, id: ObjectId) -> RepoResult<bool>;
}
