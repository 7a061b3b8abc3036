use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::{error::ApiError, extractors::principal::FromRef, state::AppState};

/// Superadmin console principal. The token is its own scheme (short TTL,
/// `token_type: superadmin`, no tenant binding); a tenant access token is
/// rejected here and vice versa.
#[derive(Debug, Clone)]
pub struct Superadmin {
    pub email: String,
}

impl<S> FromRequestParts<S> for Superadmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| ApiError::Unauthorized("No token provided".to_string()))?;

        let claims = app_state.auth.verify_superadmin_token(token)?;

        Ok(Superadmin {
            email: claims.email,
        })
    }
}
