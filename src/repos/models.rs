/*
 * Responsibility
 * - Stored shape of the four collections (users / posts / comments / likes)
 * - Patch and filter types shared by every store backend
 * - Guarded-write vocabulary (WriteGuard / Mutation)
 */
use chrono::{DateTime, Utc};

use crate::services::object_id::ObjectId;

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: ObjectId,
    pub username: String,
    pub email: String,
    pub password: String,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_admin: bool,
    pub is_active: bool,
    pub is_blocked: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: ObjectId,
    pub author_id: ObjectId,
    pub title: String,
    pub content: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: ObjectId,
    pub post_id: ObjectId,
    pub author_id: ObjectId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Like {
    pub id: ObjectId,
    pub post_id: ObjectId,
    pub user_id: ObjectId,
    pub created_at: DateTime<Utc>,
}

/// Partial update of a user document.
///
/// `bio` / `profile_picture` are tri-state:
/// - None: leave as is
/// - Some(None): clear
/// - Some(Some(v)): set v
#[derive(Debug, Clone)]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub bio: Option<Option<String>>,
    pub profile_picture: Option<Option<String>>,
    pub password: Option<String>,
    pub is_admin: Option<bool>,
    pub is_blocked: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

impl UserPatch {
    pub fn at(updated_at: DateTime<Utc>) -> Self {
        Self {
            username: None,
            email: None,
            bio: None,
            profile_picture: None,
            password: None,
            is_admin: None,
            is_blocked: None,
            updated_at,
        }
    }

    pub fn apply(&self, user: &mut User) {
        if let Some(v) = &self.username {
            user.username = v.clone();
        }
        if let Some(v) = &self.email {
            user.email = v.clone();
        }
        if let Some(v) = &self.bio {
            user.bio = v.clone();
        }
        if let Some(v) = &self.profile_picture {
            user.profile_picture = v.clone();
        }
        if let Some(v) = &self.password {
            user.password = v.clone();
        }
        if let Some(v) = self.is_admin {
            user.is_admin = v;
        }
        if let Some(v) = self.is_blocked {
            user.is_blocked = v;
        }
        user.updated_at = self.updated_at;
    }
}

#[derive(Debug, Clone)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl PostPatch {
    pub fn apply(&self, post: &mut Post) {
        if let Some(v) = &self.title {
            post.title = v.clone();
        }
        if let Some(v) = &self.content {
            post.content = v.clone();
        }
        if let Some(v) = &self.category {
            post.category = v.clone();
        }
        post.updated_at = self.updated_at;
    }
}

#[derive(Debug, Clone)]
pub struct CommentPatch {
    pub content: String,
}

impl CommentPatch {
    pub fn apply(&self, comment: &mut Comment) {
        comment.content = self.content.clone();
    }
}

/// Half-open time range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn contains(&self, t: &DateTime<Utc>) -> bool {
        self.start <= *t && *t < self.end
    }
}

#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub author_id: Option<ObjectId>,
    pub title: Option<String>,
    pub category: Option<String>,
    pub created: Option<DateRange>,
}

impl PostFilter {
    pub fn matches(&self, post: &Post) -> bool {
        self.author_id.is_none_or(|a| post.author_id == a)
            && self.title.as_ref().is_none_or(|t| &post.title == t)
            && self.category.as_ref().is_none_or(|c| &post.category == c)
            && self.created.is_none_or(|r| r.contains(&post.created_at))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CommentFilter {
    pub post_id: Option<ObjectId>,
    pub author_id: Option<ObjectId>,
}

impl CommentFilter {
    pub fn matches(&self, comment: &Comment) -> bool {
        self.post_id.is_none_or(|p| comment.post_id == p)
            && self.author_id.is_none_or(|a| comment.author_id == a)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LikeFilter {
    pub post_id: Option<ObjectId>,
    pub user_id: Option<ObjectId>,
}

impl LikeFilter {
    pub fn matches(&self, like: &Like) -> bool {
        self.post_id.is_none_or(|p| like.post_id == p)
            && self.user_id.is_none_or(|u| like.user_id == u)
    }
}

/// Condition attached to an update/delete. The store evaluates it in the same
/// operation as the write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteGuard {
    Any,
    OwnedBy(ObjectId),
}

impl WriteGuard {
    pub fn permits(&self, owner: ObjectId) -> bool {
        match self {
            WriteGuard::Any => true,
            WriteGuard::OwnedBy(actor) => *actor == owner,
        }
    }

    pub fn owner(&self) -> Option<ObjectId> {
        match self {
            WriteGuard::Any => None,
            WriteGuard::OwnedBy(actor) => Some(*actor),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mutation<T> {
    Done(T),
    NotFound,
    NotOwner,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn ts(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn date_range_is_half_open() {
        let range = DateRange {
            start: ts(2024, 4, 1),
            end: ts(2024, 5, 1),
        };
        assert!(range.contains(&ts(2024, 4, 1)));
        assert!(range.contains(&(ts(2024, 5, 1) - chrono::Duration::seconds(1))));
        assert!(!range.contains(&ts(2024, 5, 1)));
        assert!(!range.contains(&(ts(2024, 4, 1) - chrono::Duration::seconds(1))));
    }

    #[test]
    fn guard_checks_owner() {
        let owner = ObjectId::new();
        let other = ObjectId::new();
        assert!(WriteGuard::Any.permits(owner));
        assert!(WriteGuard::OwnedBy(owner).permits(owner));
        assert!(!WriteGuard::OwnedBy(other).permits(owner));
    }

    #[test]
    fn user_patch_clears_and_sets_optional_fields() {
        let now = ts(2024, 1, 1);
        let mut user = User {
            id: ObjectId::new(),
            username: "ann".into(),
            email: "ann@example.com".into(),
            password: "pw".into(),
            bio: Some("hello".into()),
            profile_picture: None,
            created_at: now,
            updated_at: now,
            is_admin: false,
            is_active: true,
            is_blocked: false,
        };
        let later = ts(2024, 2, 1);
        let patch = UserPatch {
            bio: Some(None),
            profile_picture: Some(Some("pic.png".into())),
            ..UserPatch::at(later)
        };
        patch.apply(&mut user);
        assert_eq!(user.bio, None);
        assert_eq!(user.profile_picture.as_deref(), Some("pic.png"));
        assert_eq!(user.username, "ann");
        assert_eq!(user.updated_at, later);
    }
}
