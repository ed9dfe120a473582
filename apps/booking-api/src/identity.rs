//! Caller identity from trusted headers.
//!
//! Authentication happens upstream; this service only reads who the caller
//! is. `x-user-id` is required, `x-user-role` defaults to `customer`.

use axum::{extract::FromRequestParts, http::request::Parts};

use courtside_core::{CoreError, Identity, Role};

use crate::error::{ApiError, ErrorCode};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Extractor wrapping the caller's [`Identity`].
#[derive(Debug, Clone)]
pub struct Caller(pub Identity);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                ApiError::new(
                    ErrorCode::MissingIdentity,
                    format!("{} header is required", USER_ID_HEADER),
                )
            })?;

        let role = match parts.headers.get(USER_ROLE_HEADER) {
            Some(value) => value
                .to_str()
                .map_err(|_| ApiError::validation(format!("{} is not valid text", USER_ROLE_HEADER)))?
                .parse::<Role>()
                .map_err(CoreError::from)?,
            None => Role::default(),
        };

        Ok(Caller(Identity::new(user_id, role)))
    }
}
