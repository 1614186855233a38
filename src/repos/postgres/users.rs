use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::{PgStore, decode_id};
use crate::repos::UserRepo;
use crate::repos::error::{RepoError, RepoResult};
use crate::repos::models::{User, UserPatch};
use crate::services::object_id::ObjectId;

const USER_COLUMNS: &str = r#"
    id, username, email, password, bio, profile_picture,
    is_admin, is_active, is_blocked, created_at, updated_at
"#;

#[derive(Debug, FromRow)]
struct UserRow {
    id: String,
    username: String,
    email: String,
    password: String,
    bio: Option<String>,
    profile_picture: Option<String>,
    is_admin: bool,
    is_active: bool,
    is_blocked: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepoError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: decode_id(&row.id)?,
            username: row.username,
            email: row.email,
            password: row.password,
            bio: row.bio,
            profile_picture: row.profile_picture,
            created_at: row.created_at,
            updated_at: row.updated_at,
            is_admin: row.is_admin,
            is_active: row.is_active,
            is_blocked: row.is_blocked,
        })
    }
}

#[async_trait]
impl UserRepo for PgStore {
    async fn list_users(&self) -> RepoResult<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at, id");
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn get_user(&self, id: ObjectId) -> RepoResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)?;

        row.map(User::try_from).transpose()
    }

    async fn get_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)?;

        row.map(User::try_from).transpose()
    }

    async fn insert_user(&self, user: &User) -> RepoResult<()> {
        // users_email_key turns a concurrent duplicate registration into 23505.
        sqlx::query(
            r#"
            INSERT INTO users (
                id, username, email, password, bio, profile_picture,
                is_admin, is_active, is_blocked, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password)
        .bind(user.bio.as_deref())
        .bind(user.profile_picture.as_deref())
        .bind(user.is_admin)
        .bind(user.is_active)
        .bind(user.is_blocked)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(())
    }

    async fn update_user(&self, id: ObjectId, patch: &UserPatch) -> RepoResult<Option<User>> {
        // bio / profile_picture: ($n flag, $n+1 value) pairs, same tri-state as UserPatch
        let sql = format!(
            r#"
            UPDATE users
            SET
                username = COALESCE($2, username),
                email = COALESCE($3, email),
                bio = CASE WHEN $4 THEN $5 ELSE bio END,
                profile_picture = CASE WHEN $6 THEN $7 ELSE profile_picture END,
                password = COALESCE($8, password),
                is_admin = COALESCE($9, is_admin),
                is_blocked = COALESCE($10, is_blocked),
                updated_at = $11
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id.to_string())
            .bind(patch.username.as_deref())
            .bind(patch.email.as_deref())
            .bind(patch.bio.is_some())
            .bind(patch.bio.clone().flatten())
            .bind(patch.profile_picture.is_some())
            .bind(patch.profile_picture.clone().flatten())
            .bind(patch.password.as_deref())
            .bind(patch.is_admin)
            .bind(patch.is_blocked)
            .bind(patch.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)?;

        row.map(User::try_from).transpose()
    }

    async fn delete_user(&self, id: ObjectId) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)?;

        Ok(result.rows_affected() > 0)
    }
}
