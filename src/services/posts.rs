/*
 * Responsibility
 * - Post queries (by id / author / title / category / calendar window)
 * - Create / update / rename / delete with the owner taken from the verified actor
 * - Calendar windows: zero-based months, half-open [start, end) in UTC
 */
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::repos::Store;
use crate::repos::models::{DateRange, Post, PostFilter, PostPatch, WriteGuard};
use crate::services::object_id::ObjectId;
use crate::services::settle;

#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: Option<ObjectId>,
    pub title: String,
    pub content: String,
    pub category: String,
}

#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
}

impl PostChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.category.is_none()
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn first_of(year: i32, month0: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month0 + 1, 1)
}

/// `[Jan 1 year, Jan 1 year+1)`.
pub fn year_range(year: i32) -> Result<DateRange, AppError> {
    let start = first_of(year, 0).ok_or_else(|| AppError::invalid("year is out of range"))?;
    let end = year
        .checked_add(1)
        .and_then(|next| first_of(next, 0))
        .ok_or_else(|| AppError::invalid("year is out of range"))?;
    Ok(DateRange {
        start: midnight(start),
        end: midnight(end),
    })
}

/// Month window for a zero-based month (0 = January).
pub fn month_range(year: i32, month0: u32) -> Result<DateRange, AppError> {
    if month0 > 11 {
        return Err(AppError::invalid("month must be between 0 and 11"));
    }
    let (next_year, next_month0) = if month0 == 11 {
        let next = year
            .checked_add(1)
            .ok_or_else(|| AppError::invalid("year is out of range"))?;
        (next, 0)
    } else {
        (year, month0 + 1)
    };
    let start = first_of(year, month0).ok_or_else(|| AppError::invalid("year is out of range"))?;
    let end = first_of(next_year, next_month0)
        .ok_or_else(|| AppError::invalid("year is out of range"))?;
    Ok(DateRange {
        start: midnight(start),
        end: midnight(end),
    })
}

async fn find(store: &dyn Store, filter: PostFilter) -> Result<Vec<Post>, AppError> {
    Ok(store.find_posts(&filter).await?)
}

pub async fn list_all(store: &dyn Store) -> Result<Vec<Post>, AppError> {
    find(store, PostFilter::default()).await
}

pub async fn get(store: &dyn Store, id: ObjectId) -> Result<Post, AppError> {
    store
        .get_post(id)
        .await?
        .ok_or(AppError::not_found("post"))
}

pub async fn by_author(store: &dyn Store, author_id: ObjectId) -> Result<Vec<Post>, AppError> {
    find(
        store,
        PostFilter {
            author_id: Some(author_id),
            ..PostFilter::default()
        },
    )
    .await
}

/// First post (oldest) carrying exactly this title.
pub async fn by_title(store: &dyn Store, title: &str) -> Result<Post, AppError> {
    find(
        store,
        PostFilter {
            title: Some(title.to_string()),
            ..PostFilter::default()
        },
    )
    .await?
    .into_iter()
    .next()
    .ok_or(AppError::not_found("post"))
}

pub async fn by_category(store: &dyn Store, category: &str) -> Result<Vec<Post>, AppError> {
    find(
        store,
        PostFilter {
            category: Some(category.to_string()),
            ..PostFilter::default()
        },
    )
    .await
}

pub async fn current_year(store: &dyn Store) -> Result<Vec<Post>, AppError> {
    let now = Utc::now();
    filtered(store, Some(now.year()), None, None).await
}

pub async fn current_month(store: &dyn Store) -> Result<Vec<Post>, AppError> {
    let now = Utc::now();
    filtered(store, Some(now.year()), Some(now.month0()), None).await
}

pub async fn by_year_month(
    store: &dyn Store,
    year: i32,
    month0: u32,
) -> Result<Vec<Post>, AppError> {
    filtered(store, Some(year), Some(month0), None).await
}

/// Any combination of year / month / category. A month needs a year.
pub async fn filtered(
    store: &dyn Store,
    year: Option<i32>,
    month0: Option<u32>,
    category: Option<String>,
) -> Result<Vec<Post>, AppError> {
    let created = match (year, month0) {
        (Some(y), Some(m)) => Some(month_range(y, m)?),
        (Some(y), None) => Some(year_range(y)?),
        (None, Some(_)) => return Err(AppError::invalid("month requires a year")),
        (None, None) => None,
    };

    find(
        store,
        PostFilter {
            category,
            created,
            ..PostFilter::default()
        },
    )
    .await
}

pub async fn create(store: &dyn Store, actor: &AuthCtx, input: NewPost) -> Result<Post, AppError> {
    if let Some(claimed) = input.author_id
        && claimed != actor.user_id
    {
        tracing::warn!(actor = %actor.user_id, claimed = %claimed, "post authorId does not match token");
        return Err(AppError::Forbidden("authorId must match the authenticated user"));
    }
    if input.title.trim().is_empty() {
        return Err(AppError::invalid("title is required"));
    }

    let now = Utc::now();
    let post = Post {
        id: ObjectId::new(),
        author_id: actor.user_id,
        title: input.title,
        content: input.content,
        category: input.category,
        created_at: now,
        updated_at: now,
    };
    store.insert_post(&post).await?;
    tracing::info!(post_id = %post.id, author_id = %post.author_id, "post created");

    Ok(post)
}

pub async fn update(
    store: &dyn Store,
    actor: &AuthCtx,
    id: ObjectId,
    changes: PostChanges,
) -> Result<Post, AppError> {
    if changes.is_empty() {
        return Err(AppError::invalid("nothing to update"));
    }
    if changes.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(AppError::invalid("title must not be empty"));
    }

    let patch = PostPatch {
        title: changes.title,
        content: changes.content,
        category: changes.category,
        updated_at: Utc::now(),
    };
    let outcome = store
        .update_post(id, WriteGuard::OwnedBy(actor.user_id), &patch)
        .await?;
    settle(outcome, "post")
}

pub async fn rename(
    store: &dyn Store,
    actor: &AuthCtx,
    id: ObjectId,
    title: String,
) -> Result<Post, AppError> {
    if title.trim().is_empty() {
        return Err(AppError::invalid("title is required"));
    }
    update(
        store,
        actor,
        id,
        PostChanges {
            title: Some(title),
            ..PostChanges::default()
        },
    )
    .await
}

pub async fn delete(store: &dyn Store, actor: &AuthCtx, id: ObjectId) -> Result<(), AppError> {
    let outcome = store
        .delete_post(id, WriteGuard::OwnedBy(actor.user_id))
        .await?;
    settle(outcome, "post")?;
    tracing::info!(post_id = %id, "post deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::repos::MemoryStore;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn month_three_is_april() {
        let r = month_range(2024, 3).unwrap();
        assert_eq!(r.start, at(2024, 4, 1));
        assert_eq!(r.end, at(2024, 5, 1));
    }

    #[test]
    fn january_and_december_windows() {
        let jan = month_range(2024, 0).unwrap();
        assert_eq!((jan.start, jan.end), (at(2024, 1, 1), at(2024, 2, 1)));

        let dec = month_range(2024, 11).unwrap();
        assert_eq!((dec.start, dec.end), (at(2024, 12, 1), at(2025, 1, 1)));
    }

    #[test]
    fn year_window_spans_the_calendar_year() {
        let r = year_range(2023).unwrap();
        assert_eq!((r.start, r.end), (at(2023, 1, 1), at(2024, 1, 1)));
    }

    #[test]
    fn month_twelve_is_rejected() {
        assert!(matches!(
            month_range(2024, 12),
            Err(AppError::Validation { .. })
        ));
    }

    #[test]
    fn year_past_the_calendar_limit_is_rejected() {
        assert!(matches!(
            month_range(i32::MAX, 11),
            Err(AppError::Validation { .. })
        ));
        assert!(matches!(
            year_range(i32::MAX),
            Err(AppError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn filter_with_extreme_year_is_a_validation_error() {
        let store = MemoryStore::new();
        assert!(matches!(
            filtered(&store, Some(i32::MAX), Some(11), None).await,
            Err(AppError::Validation { .. })
        ));
    }

    fn actor() -> AuthCtx {
        AuthCtx::new(ObjectId::new(), "ann".into(), false)
    }

    fn draft(title: &str) -> NewPost {
        NewPost {
            author_id: None,
            title: title.into(),
            content: "body".into(),
            category: "rust".into(),
        }
    }

    #[tokio::test]
    async fn month_without_year_is_rejected() {
        let store = MemoryStore::new();
        let err = filtered(&store, None, Some(3), None).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn owner_comes_from_the_actor() {
        let store = MemoryStore::new();
        let ann = actor();
        let post = create(&store, &ann, draft("hello")).await.unwrap();
        assert_eq!(post.author_id, ann.user_id);

        let spoofed = NewPost {
            author_id: Some(ObjectId::new()),
            ..draft("spoof")
        };
        let err = create(&store, &ann, spoofed).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn only_the_owner_can_change_or_delete() {
        let store = MemoryStore::new();
        let ann = actor();
        let bob = actor();
        let post = create(&store, &ann, draft("hello")).await.unwrap();

        let err = rename(&store, &bob, post.id, "mine".into()).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        let err = delete(&store, &bob, post.id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let renamed = rename(&store, &ann, post.id, "renamed".into()).await.unwrap();
        assert_eq!(renamed.title, "renamed");
        assert_eq!(by_title(&store, "renamed").await.unwrap().id, post.id);

        delete(&store, &ann, post.id).await.unwrap();
        let err = delete(&store, &ann, post.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn empty_update_is_rejected() {
        let store = MemoryStore::new();
        let ann = actor();
        let post = create(&store, &ann, draft("hello")).await.unwrap();
        let err = update(&store, &ann, post.id, PostChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }
}
