use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repos::models::Like;
use crate::services::likes::LikeView;
use crate::services::object_id::ObjectId;

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateLikeRequest {
    pub post_id: String,
}

impl CreateLikeRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.post_id.trim().is_empty() {
            return Err("postId is required");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct WithUserQuery {
    pub with_user: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub id: ObjectId,
    pub post_id: ObjectId,
    pub user_id: ObjectId,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl From<Like> for LikeResponse {
    fn from(l: Like) -> Self {
        Self {
            id: l.id,
            post_id: l.post_id,
            user_id: l.user_id,
            created_at: l.created_at,
            username: None,
        }
    }
}

impl From<LikeView> for LikeResponse {
    fn from(view: LikeView) -> Self {
        Self {
            username: view.username,
            ..Self::from(view.like)
        }
    }
}
