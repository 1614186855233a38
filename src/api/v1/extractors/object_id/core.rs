/*
 * Responsibility
 * - Take a single path segment as a String and parse it into an ObjectId
 * - Malformed ids become 400 INVALID_ID before any handler runs
 *
 * Keeps out
 * - Resource names (Post / Comment / ...): those live in types.rs
 */
use std::marker::PhantomData;

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::object_id::ObjectId;

pub struct PathId<T> {
    pub id: ObjectId,
    _marker: PhantomData<T>,
}

impl<T> PathId<T> {
    fn new(id: ObjectId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }
}

impl<T> Clone for PathId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for PathId<T> {}

impl<S, T> FromRequestParts<S> for PathId<T>
where
    S: Send + Sync,
    T: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::validation("INVALID_PATH", e.body_text()))?;
        let id = ObjectId::parse(&raw)?;
        Ok(Self::new(id))
    }
}

impl<T> std::fmt::Debug for PathId<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathId").field("id", &self.id).finish()
    }
}
