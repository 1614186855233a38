/*
 * Responsibility
 * - Posts request/response DTOs and the filter query
 * - authorId in a create body is optional; the owner always comes from the token
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::repos::models::Post;
use crate::services::object_id::ObjectId;
use crate::services::posts::{NewPost, PostChanges};

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub author_id: Option<String>,
    pub title: String,
    pub content: String,
    pub category: String,
}

impl CreatePostRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("title is required");
        }
        Ok(())
    }

    pub fn into_new_post(self) -> Result<NewPost, AppError> {
        let author_id = self
            .author_id
            .as_deref()
            .map(ObjectId::parse)
            .transpose()?;
        Ok(NewPost {
            author_id,
            title: self.title,
            content: self.content,
            category: self.category,
        })
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
}

impl UpdatePostRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(title) = &self.title
            && title.trim().is_empty()
        {
            return Err("title cannot be empty");
        }
        Ok(())
    }
}

impl From<UpdatePostRequest> for PostChanges {
    fn from(req: UpdatePostRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
            category: req.category,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct RenamePostRequest {
    pub title: String,
}

impl RenamePostRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("title is required");
        }
        Ok(())
    }
}

/// `GET /posts/filter?year=2024&month=3&category=rust` (month is zero-based).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct PostFilterQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: ObjectId,
    pub author_id: ObjectId,
    pub title: String,
    pub content: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(p: Post) -> Self {
        Self {
            id: p.id,
            author_id: p.author_id,
            title: p.title,
            content: p.content,
            category: p.category,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}
