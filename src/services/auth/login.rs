use crate::error::AppError;
use crate::repos::Store;
use crate::repos::models::User;
use crate::services::auth::{AuthService, IssuedToken};
use crate::services::users::normalize_email;

#[derive(Debug)]
pub struct LoginOutcome {
    pub user: User,
    pub token: IssuedToken,
}

/// Email/password login.
///
/// - Unknown email and wrong password give the same 401
/// - Blocked or deactivated accounts get 403 even with the right password
pub async fn authenticate(
    store: &dyn Store,
    auth: &AuthService,
    email: &str,
    password: &str,
) -> Result<LoginOutcome, AppError> {
    let user = store
        .get_user_by_email(&normalize_email(email))
        .await?
        .filter(|u| u.password == password)
        .ok_or_else(|| {
            tracing::debug!("login rejected: bad credentials");
            AppError::Unauthorized("invalid email or password")
        })?;

    if user.is_blocked || !user.is_active {
        tracing::warn!(user_id = %user.id, blocked = user.is_blocked, "login refused for disabled account");
        return Err(AppError::Forbidden("account is blocked or inactive"));
    }

    let token = auth.issue(&user).map_err(|err| {
        tracing::error!(error = ?err, user_id = %user.id, "failed to sign access token");
        AppError::Internal
    })?;

    tracing::info!(user_id = %user.id, "user logged in");
    Ok(LoginOutcome { user, token })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::MemoryStore;
    use crate::services::auth::JwtCodec;
    use crate::services::users::{self, NewUser};

    fn auth() -> AuthService {
        AuthService::new(JwtCodec::new(b"test-secret", 3600, 0))
    }

    async fn seeded() -> (MemoryStore, User) {
        let store = MemoryStore::new();
        let user = users::create(
            &store,
            NewUser {
                username: "ann".into(),
                email: "ann@example.com".into(),
                password: "pw".into(),
                bio: None,
                profile_picture: None,
            },
        )
        .await
        .unwrap();
        (store, user)
    }

    #[tokio::test]
    async fn correct_credentials_yield_a_verifiable_token() {
        let (store, user) = seeded().await;
        let auth = auth();
        let outcome = authenticate(&store, &auth, " ANN@example.com", "pw")
            .await
            .unwrap();
        assert_eq!(outcome.user.id, user.id);
        let verified = auth.verify(&outcome.token.token).unwrap();
        assert_eq!(verified.user_id, user.id);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_are_unauthorized() {
        let (store, _) = seeded().await;
        let auth = auth();
        for (email, password) in [("ann@example.com", "nope"), ("who@example.com", "pw")] {
            let err = authenticate(&store, &auth, email, password).await.unwrap_err();
            assert!(matches!(err, AppError::Unauthorized(_)));
        }
    }

    #[tokio::test]
    async fn blocked_account_is_forbidden() {
        let (store, user) = seeded().await;
        users::set_blocked(&store, user.id, true).await.unwrap();
        let err = authenticate(&store, &auth(), "ann@example.com", "pw")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
