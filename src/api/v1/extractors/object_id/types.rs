// Resource-tagged path ids. Everything here is re-exported via mod.rs.
use super::core::PathId;

pub enum UserTag {}
pub type UserIdParam = PathId<UserTag>;

pub enum PostTag {}
pub type PostIdParam = PathId<PostTag>;

pub enum CommentTag {}
pub type CommentIdParam = PathId<CommentTag>;

pub enum LikeTag {}
pub type LikeIdParam = PathId<LikeTag>;
