/*
 * Responsibility
 * - What the store layer reports upward
 * - Unique-index violations are surfaced as Conflict so services can map them
 */
use thiserror::Error;

pub const USERS_EMAIL_KEY: &str = "users_email_key";
pub const LIKES_POST_USER_KEY: &str = "likes_post_user_key";

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[source] sqlx::Error),
    #[error("migration failed")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("unique constraint violated: {constraint}")]
    Conflict { constraint: String },
    #[error("stored document is invalid: {0}")]
    Corrupt(String),
}

pub type RepoResult<T> = Result<T, RepoError>;

impl RepoError {
    pub fn conflict(constraint: &str) -> Self {
        RepoError::Conflict {
            constraint: constraint.to_string(),
        }
    }

    pub fn from_sqlx(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(dbe) = &e
            && dbe.code().as_deref() == Some("23505")
        {
            return RepoError::conflict(dbe.constraint().unwrap_or_default());
        }
        RepoError::Db(e)
    }
}
