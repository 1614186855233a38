pub mod auth_ctx;
pub mod object_id;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor};
pub use object_id::{CommentIdParam, LikeIdParam, PathId, PostIdParam, UserIdParam};
