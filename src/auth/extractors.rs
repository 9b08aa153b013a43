use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use crate::{auth::dto::Claims, auth::jwt::JwtKeys, error::ApiError};

/// Authentication gate: extracts and verifies the bearer token, attaching
/// the decoded identity claim to the handler. Never consults the store.
#[derive(Debug)]
pub struct AuthUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                warn!("request without a token");
                ApiError::TokenMissing
            })?;

        // "Bearer <token>": only the second space-delimited segment is the
        // token; a header with no second segment is just an invalid token.
        let token = header.split(' ').nth(1).ok_or_else(|| {
            warn!("malformed authorization header");
            ApiError::TokenInvalid
        })?;

        match keys.verify(token) {
            Ok(claims) => Ok(AuthUser(claims)),
            Err(_) => {
                warn!("invalid or expired token");
                Err(ApiError::TokenInvalid)
            }
        }
    }
}
