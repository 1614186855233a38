use std::collections::HashSet;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::repos::models::User;
use crate::services::object_id::ObjectId;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("jwt verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("token expired")]
    Expired,
    #[error("invalid 'sub' (expected object id)")]
    InvalidSubject,
}

/// Access token claims. The payload mirrors the public part of the user
/// document; the password never goes into a token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenClaims {
    pub sub: String,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub iat: i64,
    pub exp: i64,
}

/// What the middleware gets back after a successful verification.
#[derive(Debug, Clone)]
pub struct VerifiedAccessToken {
    pub user_id: ObjectId,
    pub username: String,
    pub is_admin: bool,
    pub exp: i64,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: i64,
}

/// HS256 signer/verifier around the server-held secret.
///
/// - Key material is not printable via Debug.
/// - Expiry is checked here (not by jsonwebtoken) so the boundary is explicit:
///   a token is valid while `now <= exp + leeway`.
#[derive(Clone)]
pub struct JwtCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: u64,
    leeway_seconds: u64,
}

impl std::fmt::Debug for JwtCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtCodec")
            .field("ttl_seconds", &self.ttl_seconds)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

impl JwtCodec {
    pub fn new(secret: &[u8], ttl_seconds: u64, leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.required_spec_claims =
            HashSet::from(["exp".to_string(), "sub".to_string()]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl_seconds,
            leeway_seconds,
        }
    }

    pub fn issue_at(&self, user: &User, now: i64) -> Result<IssuedToken, TokenError> {
        let exp = now.saturating_add(i64::try_from(self.ttl_seconds).unwrap_or(i64::MAX));
        let claims = AccessTokenClaims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            is_admin: user.is_admin,
            iat: now,
            exp,
        };

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        let token = jsonwebtoken::encode(&header, &claims, &self.encoding_key)?;

        Ok(IssuedToken {
            token,
            expires_at: exp,
        })
    }

    pub fn verify_at(&self, token: &str, now: i64) -> Result<VerifiedAccessToken, TokenError> {
        let data = jsonwebtoken::decode::<AccessTokenClaims>(
            token,
            &self.decoding_key,
            &self.validation,
        )?;
        let claims = data.claims;

        let leeway = i64::try_from(self.leeway_seconds).unwrap_or(i64::MAX);
        if now > claims.exp.saturating_add(leeway) {
            return Err(TokenError::Expired);
        }

        let user_id = ObjectId::parse(&claims.sub).map_err(|_| TokenError::InvalidSubject)?;

        Ok(VerifiedAccessToken {
            user_id,
            username: claims.username,
            is_admin: claims.is_admin,
            exp: claims.exp,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn user(is_admin: bool) -> User {
        let now = Utc::now();
        User {
            id: ObjectId::new(),
            username: "ann".into(),
            email: "ann@example.com".into(),
            password: "hunter2".into(),
            bio: None,
            profile_picture: None,
            created_at: now,
            updated_at: now,
            is_admin,
            is_active: true,
            is_blocked: false,
        }
    }

    const DAY: u64 = 24 * 60 * 60;
    const NOW: i64 = 1_700_000_000;

    #[test]
    fn issued_token_verifies_with_the_same_identity() {
        let codec = JwtCodec::new(b"secret", DAY, 0);
        let u = user(true);
        let issued = codec.issue_at(&u, NOW).unwrap();
        assert_eq!(issued.expires_at, NOW + DAY as i64);

        let verified = codec.verify_at(&issued.token, NOW + 10).unwrap();
        assert_eq!(verified.user_id, u.id);
        assert_eq!(verified.username, "ann");
        assert!(verified.is_admin);
    }

    #[test]
    fn token_is_accepted_at_expiry_and_rejected_one_second_later() {
        let codec = JwtCodec::new(b"secret", DAY, 0);
        let issued = codec.issue_at(&user(false), NOW).unwrap();

        assert!(codec.verify_at(&issued.token, issued.expires_at).is_ok());
        assert!(matches!(
            codec.verify_at(&issued.token, issued.expires_at + 1),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn leeway_extends_the_boundary() {
        let codec = JwtCodec::new(b"secret", DAY, 30);
        let issued = codec.issue_at(&user(false), NOW).unwrap();
        assert!(codec.verify_at(&issued.token, issued.expires_at + 30).is_ok());
        assert!(codec.verify_at(&issued.token, issued.expires_at + 31).is_err());
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let issuer = JwtCodec::new(b"secret-a", DAY, 0);
        let verifier = JwtCodec::new(b"secret-b", DAY, 0);
        let issued = issuer.issue_at(&user(false), NOW).unwrap();
        assert!(matches!(
            verifier.verify_at(&issued.token, NOW),
            Err(TokenError::Jwt(_))
        ));
    }

    #[test]
    fn garbage_is_rejected() {
        let codec = JwtCodec::new(b"secret", DAY, 0);
        assert!(codec.verify_at("not.a.jwt", NOW).is_err());
    }

    #[test]
    fn password_is_not_part_of_the_payload() {
        let codec = JwtCodec::new(b"secret", DAY, 0);
        let issued = codec.issue_at(&user(false), NOW).unwrap();
        let data = jsonwebtoken::decode::<serde_json::Value>(
            &issued.token,
            &DecodingKey::from_secret(b"secret"),
            &codec.validation,
        )
        .unwrap();
        assert!(data.claims.get("password").is_none());
        assert_eq!(data.claims["isAdmin"], false);
    }
}
