pub mod jwt;
pub mod login;

use chrono::Utc;

use crate::config::Config;
use crate::repos::models::User;

pub use jwt::{IssuedToken, JwtCodec, TokenError, VerifiedAccessToken};

/// Process-level token service: signs tokens on login, verifies them in the
/// auth middleware. Lives in AppState behind an Arc.
#[derive(Clone, Debug)]
pub struct AuthService {
    jwt: JwtCodec,
}

impl AuthService {
    pub fn new(jwt: JwtCodec) -> Self {
        Self { jwt }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(JwtCodec::new(
            config.jwt_secret.as_bytes(),
            config.access_token_ttl_seconds,
            config.access_token_leeway_seconds,
        ))
    }

    pub fn issue(&self, user: &User) -> Result<IssuedToken, TokenError> {
        self.jwt.issue_at(user, Utc::now().timestamp())
    }

    pub fn verify(&self, token: &str) -> Result<VerifiedAccessToken, TokenError> {
        self.jwt.verify_at(token, Utc::now().timestamp())
    }

    pub fn codec(&self) -> &JwtCodec {
        &self.jwt
    }
}
