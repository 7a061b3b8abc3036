use axum::{extract::FromRequestParts, http::request::Parts};
use subtle::ConstantTimeEq;

use crate::{error::ApiError, extractors::principal::FromRef, state::AppState};

/// Shared-secret gate for the cron endpoints: the `x-cron-key` header must
/// match the configured key exactly. No tenant session is involved.
#[derive(Debug, Clone, Copy)]
pub struct CronKey;

impl<S> FromRequestParts<S> for CronKey
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let key = parts
            .headers
            .get("x-cron-key")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing cron key".to_string()))?;

        // Constant-time comparison for the shared secret.
        let expected = app_state.settings.cron.key.as_bytes();
        if key.as_bytes().ct_eq(expected).unwrap_u8() != 1 {
            return Err(ApiError::Unauthorized("Invalid cron key".to_string()));
        }

        Ok(CronKey)
    }
}
