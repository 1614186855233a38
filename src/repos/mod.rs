/*
 * Responsibility
 * - The document store seam: one `Store` handle covering every collection
 * - Backend selection at startup (PostgreSQL when DATABASE_URL is set, memory otherwise)
 * - The handle is built once and injected through AppState
 */
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;

pub mod comment_repo;
pub mod error;
pub mod like_repo;
pub mod memory;
pub mod models;
pub mod post_repo;
pub mod postgres;
pub mod user_repo;

pub use comment_repo::CommentRepo;
pub use error::{RepoError, RepoResult};
pub use like_repo::LikeRepo;
pub use memory::MemoryStore;
pub use post_repo::PostRepo;
pub use postgres::PgStore;
pub use user_repo::UserRepo;

#[async_trait]
pub trait Store: UserRepo + PostRepo + CommentRepo + LikeRepo {
    // Backend name for logging.
    fn backend_name(&self) -> &'static str;

    // Release connections. The handle must not be used afterwards.
    async fn close(&self);
}

pub async fn connect(config: &Config) -> RepoResult<Arc<dyn Store>> {
    match config.database_url.as_deref() {
        Some(url) => {
            let store = PgStore::connect(url, config.database_max_connections).await?;
            tracing::info!(
                max_connections = config.database_max_connections,
                "connected to PostgreSQL"
            );
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("DATABASE_URL is not set; using the in-memory store (data is lost on exit)");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
