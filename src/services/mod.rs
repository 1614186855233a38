/*
 * Responsibility
 * - Per-entity service functions (users / posts / comments / likes) and auth
 * - Services take the injected store, the verified actor where it matters,
 *   and return domain values or AppError
 */
pub mod auth;
pub mod comments;
pub mod likes;
pub mod object_id;
pub mod posts;
pub mod users;

use crate::error::AppError;
use crate::repos::models::Mutation;

/// Turn the outcome of a guarded write into the value or the matching error.
pub(crate) fn settle<T>(outcome: Mutation<T>, resource: &'static str) -> Result<T, AppError> {
    match outcome {
        Mutation::Done(value) => Ok(value),
        Mutation::NotFound => Err(AppError::not_found(resource)),
        Mutation::NotOwner => Err(AppError::Forbidden("only the owner can modify this resource")),
    }
}
