/*
 * Responsibility
 * - The authenticated context as handlers see it
 * - Middleware verifies the token and stores this in request extensions;
 *   handlers and services only ever receive this type
 */
use crate::services::auth::VerifiedAccessToken;
use crate::services::object_id::ObjectId;

/// Identity attached to an authenticated request.
///
/// - `user_id` is the token subject; every ownership check compares against it
/// - `is_admin` is the role claim at issuance time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub user_id: ObjectId,
    pub username: String,
    pub is_admin: bool,
}

impl AuthCtx {
    pub fn new(user_id: ObjectId, username: String, is_admin: bool) -> Self {
        Self {
            user_id,
            username,
            is_admin,
        }
    }
}

impl From<VerifiedAccessToken> for AuthCtx {
    fn from(token: VerifiedAccessToken) -> Self {
        Self::new(token.user_id, token.username, token.is_admin)
    }
}
