use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, Postgres, QueryBuilder};

use super::{PgStore, decode_id};
use crate::repos::PostRepo;
use crate::repos::error::{RepoError, RepoResult};
use crate::repos::models::{Mutation, Post, PostFilter, PostPatch, WriteGuard};
use crate::services::object_id::ObjectId;

const POST_COLUMNS: &str = "id, author_id, title, content, category, created_at, updated_at";

#[derive(Debug, FromRow)]
struct PostRow {
    id: String,
    author_id: String,
    title: String,
    content: String,
    category: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PostRow> for Post {
    type Error = RepoError;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        Ok(Post {
            id: decode_id(&row.id)?,
            author_id: decode_id(&row.author_id)?,
            title: row.title,
            content: row.content,
            category: row.category,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl PostRepo for PgStore {
    async fn find_posts(&self, filter: &PostFilter) -> RepoResult<Vec<Post>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE TRUE"
        ));
        if let Some(author_id) = filter.author_id {
            qb.push(" AND author_id = ").push_bind(author_id.to_string());
        }
        if let Some(title) = &filter.title {
            qb.push(" AND title = ").push_bind(title.clone());
        }
        if let Some(category) = &filter.category {
            qb.push(" AND category = ").push_bind(category.clone());
        }
        if let Some(range) = filter.created {
            qb.push(" AND created_at >= ").push_bind(range.start);
            qb.push(" AND created_at < ").push_bind(range.end);
        }
        qb.push(" ORDER BY created_at, id");

        let rows = qb
            .build_query_as::<PostRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)?;

        rows.into_iter().map(Post::try_from).collect()
    }

    async fn get_post(&self, id: ObjectId) -> RepoResult<Option<Post>> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1");
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)?;

        row.map(Post::try_from).transpose()
    }

    async fn insert_post(&self, post: &Post) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, author_id, title, content, category, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(post.id.to_string())
        .bind(post.author_id.to_string())
        .bind(&post.title)
        .bind(&post.content)
        .bind(&post.category)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(())
    }

    async fn update_post(
        &self,
        id: ObjectId,
        guard: WriteGuard,
        patch: &PostPatch,
    ) -> RepoResult<Mutation<Post>> {
        let sql = format!(
            r#"
            UPDATE posts
            SET
                title = COALESCE($3, title),
                content = COALESCE($4, content),
                category = COALESCE($5, category),
                updated_at = $6
            WHERE id = $1 AND ($2::text IS NULL OR author_id = $2)
            RETURNING {POST_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id.to_string())
            .bind(guard.owner().map(|o| o.to_string()))
            .bind(patch.title.as_deref())
            .bind(patch.content.as_deref())
            .bind(patch.category.as_deref())
            .bind(patch.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)?;

        match row {
            Some(row) => Ok(Mutation::Done(Post::try_from(row)?)),
            None => self.resolve_miss("posts", id).await,
        }
    }

    async fn delete_post(&self, id: ObjectId, guard: WriteGuard) -> RepoResult<Mutation<()>> {
        let result =
            sqlx::query("DELETE FROM posts WHERE id = $1 AND ($2::text IS NULL OR author_id = $2)")
                .bind(id.to_string())
                .bind(guard.owner().map(|o| o.to_string()))
                .execute(&self.pool)
                .await
                .map_err(RepoError::from_sqlx)?;

        if result.rows_affected() > 0 {
            return Ok(Mutation::Done(()));
        }
        self.resolve_miss("posts", id).await
    }
}
