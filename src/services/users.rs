/*
 * Responsibility
 * - Account lifecycle: register, profile update, delete, block/unblock,
 *   password and role changes
 * - "Who may do this" is decided from the verified AuthCtx only
 */
use std::collections::HashMap;

use chrono::Utc;

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::repos::Store;
use crate::repos::error::RepoError;
use crate::repos::models::{User, UserPatch};
use crate::services::object_id::ObjectId;

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub bio: Option<Option<String>>,
    pub profile_picture: Option<Option<String>>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.bio.is_none()
            && self.profile_picture.is_none()
    }
}

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

fn email_conflict(e: RepoError) -> AppError {
    match e {
        RepoError::Conflict { .. } => {
            AppError::conflict("EMAIL_TAKEN", "an account with this email already exists")
        }
        other => other.into(),
    }
}

fn ensure_self(actor: &AuthCtx, id: ObjectId) -> Result<(), AppError> {
    if actor.user_id != id {
        tracing::warn!(actor = %actor.user_id, target = %id, "attempt to modify another account");
        return Err(AppError::Forbidden("cannot modify another user's account"));
    }
    Ok(())
}

async fn apply_patch(store: &dyn Store, id: ObjectId, patch: UserPatch) -> Result<User, AppError> {
    store
        .update_user(id, &patch)
        .await
        .map_err(email_conflict)?
        .ok_or(AppError::not_found("user"))
}

pub async fn list(store: &dyn Store) -> Result<Vec<User>, AppError> {
    Ok(store.list_users().await?)
}

pub async fn get(store: &dyn Store, id: ObjectId) -> Result<User, AppError> {
    store
        .get_user(id)
        .await?
        .ok_or(AppError::not_found("user"))
}

pub async fn get_by_email(store: &dyn Store, email: &str) -> Result<User, AppError> {
    store
        .get_user_by_email(&normalize_email(email))
        .await?
        .ok_or(AppError::not_found("user"))
}

/// Registration. The store rejects a taken email atomically with the insert.
pub async fn create(store: &dyn Store, input: NewUser) -> Result<User, AppError> {
    let now = Utc::now();
    let user = User {
        id: ObjectId::new(),
        username: input.username.trim().to_string(),
        email: normalize_email(&input.email),
        password: input.password,
        bio: input.bio,
        profile_picture: input.profile_picture,
        created_at: now,
        updated_at: now,
        is_admin: false,
        is_active: true,
        is_blocked: false,
    };

    store.insert_user(&user).await.map_err(email_conflict)?;
    tracing::info!(user_id = %user.id, "user registered");

    Ok(user)
}

pub async fn update_profile(
    store: &dyn Store,
    actor: &AuthCtx,
    id: ObjectId,
    changes: ProfileChanges,
) -> Result<User, AppError> {
    ensure_self(actor, id)?;
    if changes.is_empty() {
        return Err(AppError::invalid("nothing to update"));
    }

    let patch = UserPatch {
        username: changes.username.map(|s| s.trim().to_string()),
        email: changes.email.as_deref().map(normalize_email),
        bio: changes.bio,
        profile_picture: changes.profile_picture,
        ..UserPatch::at(Utc::now())
    };
    apply_patch(store, id, patch).await
}

/// Self-service deletion, or by an administrator. Content owned by the user is kept.
pub async fn delete(store: &dyn Store, actor: &AuthCtx, id: ObjectId) -> Result<(), AppError> {
    if actor.user_id != id && !actor.is_admin {
        return Err(AppError::Forbidden("cannot delete another user's account"));
    }
    if !store.delete_user(id).await? {
        return Err(AppError::not_found("user"));
    }
    tracing::info!(user_id = %id, by = %actor.user_id, "user deleted");
    Ok(())
}

pub async fn set_blocked(store: &dyn Store, id: ObjectId, blocked: bool) -> Result<User, AppError> {
    let patch = UserPatch {
        is_blocked: Some(blocked),
        ..UserPatch::at(Utc::now())
    };
    let user = apply_patch(store, id, patch).await?;
    tracing::info!(user_id = %id, blocked, "user block flag changed");
    Ok(user)
}

pub async fn change_password(
    store: &dyn Store,
    actor: &AuthCtx,
    id: ObjectId,
    password: String,
) -> Result<(), AppError> {
    ensure_self(actor, id)?;
    if password.is_empty() {
        return Err(AppError::invalid("password is required"));
    }
    let patch = UserPatch {
        password: Some(password),
        ..UserPatch::at(Utc::now())
    };
    apply_patch(store, id, patch).await?;
    Ok(())
}

pub async fn set_admin(store: &dyn Store, id: ObjectId, is_admin: bool) -> Result<User, AppError> {
    let patch = UserPatch {
        is_admin: Some(is_admin),
        ..UserPatch::at(Utc::now())
    };
    let user = apply_patch(store, id, patch).await?;
    tracing::info!(user_id = %id, is_admin, "user role changed");
    Ok(user)
}

/// Username lookup for enriched comment/like listings. Missing users are skipped.
pub async fn usernames(
    store: &dyn Store,
    ids: &[ObjectId],
) -> Result<HashMap<ObjectId, String>, AppError> {
    let mut names = HashMap::new();
    for &id in ids {
        if names.contains_key(&id) {
            continue;
        }
        if let Some(user) = store.get_user(id).await? {
            names.insert(id, user.username);
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::MemoryStore;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            username: "ann".into(),
            email: email.into(),
            password: "pw".into(),
            bio: None,
            profile_picture: None,
        }
    }

    fn actor_for(user: &User) -> AuthCtx {
        AuthCtx::new(user.id, user.username.clone(), user.is_admin)
    }

    #[tokio::test]
    async fn email_is_unique_regardless_of_case() {
        let store = MemoryStore::new();
        create(&store, new_user("Ann@Example.com")).await.unwrap();
        let err = create(&store, new_user("ann@example.com ")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict { code: "EMAIL_TAKEN", .. }));
    }

    #[tokio::test]
    async fn profile_can_only_be_changed_by_its_owner() {
        let store = MemoryStore::new();
        let ann = create(&store, new_user("ann@example.com")).await.unwrap();
        let bob = create(&store, new_user("bob@example.com")).await.unwrap();

        let changes = ProfileChanges {
            bio: Some(Some("hi".into())),
            ..ProfileChanges::default()
        };
        let err = update_profile(&store, &actor_for(&bob), ann.id, changes.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let updated = update_profile(&store, &actor_for(&ann), ann.id, changes)
            .await
            .unwrap();
        assert_eq!(updated.bio.as_deref(), Some("hi"));
    }

    #[tokio::test]
    async fn empty_profile_update_is_rejected() {
        let store = MemoryStore::new();
        let ann = create(&store, new_user("ann@example.com")).await.unwrap();
        let err = update_profile(&store, &actor_for(&ann), ann.id, ProfileChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn admin_may_delete_others_and_second_delete_is_not_found() {
        let store = MemoryStore::new();
        let ann = create(&store, new_user("ann@example.com")).await.unwrap();
        let admin = AuthCtx::new(ObjectId::new(), "root".into(), true);

        delete(&store, &admin, ann.id).await.unwrap();
        let err = delete(&store, &admin, ann.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn password_change_is_stored_verbatim() {
        let store = MemoryStore::new();
        let ann = create(&store, new_user("ann@example.com")).await.unwrap();
        change_password(&store, &actor_for(&ann), ann.id, "new-pw".into())
            .await
            .unwrap();
        assert_eq!(get(&store, ann.id).await.unwrap().password, "new-pw");
    }
}
