//! User context extraction.
//!
//! Authentication happens upstream; the gateway forwards the verified user id
//! in [`USER_ID_HEADER`]. A request without it has no user context.

use axum::{extract::FromRequestParts, http::request::Parts};
use domains::UserId;

use crate::error::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserId);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        Ok(Self(UserId::parse(raw)?))
    }
}
