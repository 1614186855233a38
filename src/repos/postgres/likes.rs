use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, Postgres, QueryBuilder};

use super::{PgStore, decode_id};
use crate::repos::LikeRepo;
use crate::repos::error::{RepoError, RepoResult};
use crate::repos::models::{Like, LikeFilter, Mutation, WriteGuard};
use crate::services::object_id::ObjectId;

const LIKE_COLUMNS: &str = "id, post_id, user_id, created_at";

#[derive(Debug, FromRow)]
struct LikeRow {
    id: String,
    post_id: String,
    user_id: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<LikeRow> for Like {
    type Error = RepoError;

    fn try_from(row: LikeRow) -> Result<Self, Self::Error> {
        Ok(Like {
            id: decode_id(&row.id)?,
            post_id: decode_id(&row.post_id)?,
            user_id: decode_id(&row.user_id)?,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl LikeRepo for PgStore {
    async fn find_likes(&self, filter: &LikeFilter) -> RepoResult<Vec<Like>> {
        let mut qb =
            QueryBuilder::<Postgres>::new(format!("SELECT {LIKE_COLUMNS} FROM likes WHERE TRUE"));
        if let Some(post_id) = filter.post_id {
            qb.push(" AND post_id = ").push_bind(post_id.to_string());
        }
        if let Some(user_id) = filter.user_id {
            qb.push(" AND user_id = ").push_bind(user_id.to_string());
        }
        qb.push(" ORDER BY created_at, id");

        let rows = qb
            .build_query_as::<LikeRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)?;

        rows.into_iter().map(Like::try_from).collect()
    }

    async fn get_like(&self, id: ObjectId) -> RepoResult<Option<Like>> {
        let sql = format!("SELECT {LIKE_COLUMNS} FROM likes WHERE id = $1");
        let row = sqlx::query_as::<_, LikeRow>(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)?;

        row.map(Like::try_from).transpose()
    }

    async fn insert_like(&self, like: &Like) -> RepoResult<()> {
        // likes_post_user_key rejects a second like of the same post by the same user.
        sqlx::query(
            r#"
            INSERT INTO likes (id, post_id, user_id, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(like.id.to_string())
        .bind(like.post_id.to_string())
        .bind(like.user_id.to_string())
        .bind(like.created_at)
        .execute(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(())
    }

    async fn delete_like(&self, id: ObjectId, guard: WriteGuard) -> RepoResult<Mutation<()>> {
        let result =
            sqlx::query("DELETE FROM likes WHERE id = $1 AND ($2::text IS NULL OR user_id = $2)")
                .bind(id.to_string())
                .bind(guard.owner().map(|o| o.to_string()))
                .execute(&self.pool)
                .await
                .map_err(RepoError::from_sqlx)?;

        if result.rows_affected() > 0 {
            return Ok(Mutation::Done(()));
        }
        self.resolve_miss("likes", id).await
    }
}
