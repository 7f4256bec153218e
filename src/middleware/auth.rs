use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::domain::CurrentUser;
use crate::error::AppError;

/// Header carrying the numeric id of the user authenticated by the upstream auth layer.
pub const USER_ID_HEADER: &str = "x-user-id";

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing caller identity".to_string()))?;

        match raw.trim().parse::<i64>() {
            Ok(id) if id > 0 => Ok(CurrentUser { id }),
            _ => {
                tracing::warn!(header = %raw, "Rejected malformed caller identity");
                Err(AppError::Unauthorized("invalid caller identity".to_string()))
            }
        }
    }
}
