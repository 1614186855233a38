/*
 * Responsibility
 * - PostgreSQL-backed Store (sqlx)
 * - Pool creation + bundled migrations at connect time
 * - Shared helpers: id binding / decoding, guarded-write miss resolution
 */
use async_trait::async_trait;
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::repos::Store;
use crate::repos::error::{RepoError, RepoResult};
use crate::repos::models::Mutation;
use crate::services::object_id::ObjectId;

mod comments;
mod likes;
mod posts;
mod users;

#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> RepoResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(RepoError::Db)?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    #[cfg(test)]
    pub(crate) fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    // A guarded UPDATE/DELETE touched no row: tell "absent" apart from "not yours".
    async fn resolve_miss<T>(&self, table: &'static str, id: ObjectId) -> RepoResult<Mutation<T>> {
        let sql = format!("SELECT EXISTS (SELECT 1 FROM {table} WHERE id = $1)");
        let exists: bool = sqlx::query_scalar(&sql)
            .bind(id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(RepoError::from_sqlx)?;

        Ok(if exists {
            Mutation::NotOwner
        } else {
            Mutation::NotFound
        })
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

pub(crate) fn decode_id(raw: &str) -> RepoResult<ObjectId> {
    ObjectId::parse(raw).map_err(|e| RepoError::Corrupt(format!("bad id {raw:?}: {e}")))
}

// These run against a scratch database created per test; set DATABASE_URL and
// pass `--ignored` to include them.
#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sqlx::PgPool;

    use super::*;
    use crate::repos::models::{Like, Post, PostPatch, User, UserPatch, WriteGuard};
    use crate::repos::{LikeRepo, PostRepo, UserRepo};

    fn user(email: &str) -> User {
        let now = Utc::now();
        User {
            id: ObjectId::new(),
            username: "ann".into(),
            email: email.into(),
            password: "pw".into(),
            bio: Some("hello".into()),
            profile_picture: None,
            created_at: now,
            updated_at: now,
            is_admin: false,
            is_active: true,
            is_blocked: false,
        }
    }

    fn post(author_id: ObjectId) -> Post {
        let now = Utc::now();
        Post {
            id: ObjectId::new(),
            author_id,
            title: "first".into(),
            content: "body".into(),
            category: "misc".into(),
            created_at: now,
            updated_at: now,
        }
    }

    fn retitle(title: &str) -> PostPatch {
        PostPatch {
            title: Some(title.into()),
            content: None,
            category: None,
            updated_at: Utc::now(),
        }
    }

    #[sqlx::test]
    #[ignore = "needs DATABASE_URL"]
    async fn guarded_post_update_tells_missing_from_foreign(pool: PgPool) {
        let store = PgStore::from_pool(pool);
        let owner = ObjectId::new();
        let p = post(owner);
        store.insert_post(&p).await.unwrap();

        let stranger = WriteGuard::OwnedBy(ObjectId::new());
        assert_eq!(
            store.update_post(p.id, stranger, &retitle("x")).await.unwrap(),
            Mutation::NotOwner
        );
        assert_eq!(
            store
                .update_post(ObjectId::new(), WriteGuard::OwnedBy(owner), &retitle("x"))
                .await
                .unwrap(),
            Mutation::NotFound
        );

        match store
            .update_post(p.id, WriteGuard::OwnedBy(owner), &retitle("second"))
            .await
            .unwrap()
        {
            Mutation::Done(updated) => {
                assert_eq!(updated.title, "second");
                assert_eq!(updated.content, "body");
            }
            other => panic!("unexpected {other:?}"),
        }

        assert_eq!(
            store.delete_post(p.id, stranger).await.unwrap(),
            Mutation::NotOwner
        );
        assert_eq!(
            store.delete_post(p.id, WriteGuard::Any).await.unwrap(),
            Mutation::Done(())
        );
        assert!(store.get_post(p.id).await.unwrap().is_none());
    }

    #[sqlx::test]
    #[ignore = "needs DATABASE_URL"]
    async fn user_patch_keeps_clears_and_sets_bio(pool: PgPool) {
        let store = PgStore::from_pool(pool);
        let u = user("ann@example.com");
        store.insert_user(&u).await.unwrap();

        let untouched = UserPatch {
            username: Some("anne".into()),
            ..UserPatch::at(Utc::now())
        };
        let got = store.update_user(u.id, &untouched).await.unwrap().unwrap();
        assert_eq!(got.username, "anne");
        assert_eq!(got.bio.as_deref(), Some("hello"));

        let cleared = UserPatch {
            bio: Some(None),
            ..UserPatch::at(Utc::now())
        };
        let got = store.update_user(u.id, &cleared).await.unwrap().unwrap();
        assert_eq!(got.bio, None);

        let set = UserPatch {
            bio: Some(Some("again".into())),
            ..UserPatch::at(Utc::now())
        };
        let got = store.update_user(u.id, &set).await.unwrap().unwrap();
        assert_eq!(got.bio.as_deref(), Some("again"));
        assert_eq!(got.email, "ann@example.com");
    }

    #[sqlx::test]
    #[ignore = "needs DATABASE_URL"]
    async fn unique_keys_surface_as_conflicts(pool: PgPool) {
        let store = PgStore::from_pool(pool);
        store.insert_user(&user("dup@example.com")).await.unwrap();
        let err = store.insert_user(&user("dup@example.com")).await.unwrap_err();
        assert!(matches!(
            err,
            RepoError::Conflict { ref constraint } if constraint == crate::repos::error::USERS_EMAIL_KEY
        ));

        let (post_id, user_id) = (ObjectId::new(), ObjectId::new());
        let like = || Like {
            id: ObjectId::new(),
            post_id,
            user_id,
            created_at: Utc::now(),
        };
        store.insert_like(&like()).await.unwrap();
        let err = store.insert_like(&like()).await.unwrap_err();
        assert!(matches!(
            err,
            RepoError::Conflict { ref constraint } if constraint == crate::repos::error::LIKES_POST_USER_KEY
        ));
    }
}
