//! Bearer access token verification -> AuthCtx in request extensions.
//!
//! - `verify_logged_user`: any valid token
//! - `verify_admin`: valid token whose claims carry the administrator flag
//!
//! Rejections:
//! - no `Authorization: Bearer <token>` header: 401
//! - bad signature, malformed or expired token: 403
//! - valid token without the admin flag on an admin route: 401
//!
//! Mounted per route with `from_fn_with_state` + `route_layer` (see api::v1::routes).

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Unauthorized("access token required"))
}

fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AuthCtx, AppError> {
    let token = bearer_token(headers)?;

    match state.auth.verify(token) {
        Ok(verified) => Ok(verified.into()),
        Err(err) => {
            tracing::warn!(error = ?err, "access token verification failed");
            Err(AppError::Forbidden("invalid or expired token"))
        }
    }
}

pub async fn verify_logged_user(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_ctx = authenticate(&state, req.headers())?;

    // middleware -> extractor
    req.extensions_mut().insert(auth_ctx);

    Ok(next.run(req).await)
}

pub async fn verify_admin(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_ctx = authenticate(&state, req.headers())?;

    if !auth_ctx.is_admin {
        tracing::warn!(user_id = %auth_ctx.user_id, path = %req.uri().path(), "admin route refused");
        return Err(AppError::Unauthorized("administrator privileges required"));
    }

    req.extensions_mut().insert(auth_ctx);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn bearer_token_requires_the_scheme_and_a_value() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_err());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(bearer_token(&headers).is_err());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(bearer_token(&headers).is_err());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def");
    }
}
