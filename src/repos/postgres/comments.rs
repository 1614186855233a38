use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, Postgres, QueryBuilder};

use super::{PgStore, decode_id};
use crate::repos::CommentRepo;
use crate::repos::error::{RepoError, RepoResult};
use crate::repos::models::{Comment, CommentFilter, CommentPatch, Mutation, WriteGuard};
use crate::services::object_id::ObjectId;

const COMMENT_COLUMNS: &str = "id, post_id, author_id, content, created_at";

#[derive(Debug, FromRow)]
struct CommentRow {
    id: String,
    post_id: String,
    author_id: String,
    content: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<CommentRow> for Comment {
    type Error = RepoError;

    fn try_from(row: CommentRow) -> Result<Self, Self::Error> {
        Ok(Comment {
            id: decode_id(&row.id)?,
            post_id: decode_id(&row.post_id)?,
            author_id: decode_id(&row.author_id)?,
            content: row.content,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl CommentRepo for PgStore {
    async fn find_comments(&self, filter: &CommentFilter) -> RepoResult<Vec<Comment>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE TRUE"
        ));
        if let Some(post_id) = filter.post_id {
            qb.push(" AND post_id = ").push_bind(post_id.to_string());
        }
        if let Some(author_id) = filter.author_id {
            qb.push(" AND author_id = ").push_bind(author_id.to_string());
        }
        qb.push(" ORDER BY created_at, id");

        let rows = qb
            .build_query_as::<CommentRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)?;

        rows.into_iter().map(Comment::try_from).collect()
    }

    async fn get_comment(&self, id: ObjectId) -> RepoResult<Option<Comment>> {
        let sql = format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1");
        let row = sqlx::query_as::<_, CommentRow>(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)?;

        row.map(Comment::try_from).transpose()
    }

    async fn insert_comment(&self, comment: &Comment) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, post_id, author_id, content, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(comment.id.to_string())
        .bind(comment.post_id.to_string())
        .bind(comment.author_id.to_string())
        .bind(&comment.content)
        .bind(comment.created_at)
        .execute(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(())
    }

    async fn update_comment(
        &self,
        id: ObjectId,
        guard: WriteGuard,
        patch: &CommentPatch,
    ) -> RepoResult<Mutation<Comment>> {
        let sql = format!(
            r#"
            UPDATE comments
            SET content = $3
            WHERE id = $1 AND ($2::text IS NULL OR author_id = $2)
            RETURNING {COMMENT_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, CommentRow>(&sql)
            .bind(id.to_string())
            .bind(guard.owner().map(|o| o.to_string()))
            .bind(&patch.content)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)?;

        match row {
            Some(row) => Ok(Mutation::Done(Comment::try_from(row)?)),
            None => self.resolve_miss("comments", id).await,
        }
    }

    async fn delete_comment(
        &self,
        id: ObjectId,
        guard: WriteGuard,
    ) -> RepoResult<Mutation<()>> {
        let result = sqlx::query(
            "DELETE FROM comments WHERE id = $1 AND ($2::text IS NULL OR author_id = $2)",
        )
        .bind(id.to_string())
        .bind(guard.owner().map(|o| o.to_string()))
        .execute(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        if result.rows_affected() > 0 {
            return Ok(Mutation::Done(()));
        }
        self.resolve_miss("comments", id).await
    }
}
