use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use bson::oid::ObjectId;
use casefolio_db::models::Role;
use casefolio_services::auth::Claims;
use casefolio_services::dao::OrgScope;

use crate::{error::ApiError, state::AppState};

/// The authenticated tenant principal, resolved from a JWT in the
/// Authorization header or the `access_token` cookie. Handlers never see a
/// half-authenticated request: no valid token means the extractor rejects
/// with 401 before any handler code runs. A deactivated organization
/// rejects with 403.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: ObjectId,
    pub email: String,
    pub role: Role,
    pub organization_id: ObjectId,
}

impl Principal {
    /// Role gate: wrong role is a 403, distinct from the extractor's 401.
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), ApiError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(ApiError::Forbidden(
                "Insufficient role for this operation".to_string(),
            ))
        }
    }

    /// Scope for every DAO call this request makes. Client principals get
    /// the ownership predicate baked in.
    pub fn scope(&self) -> OrgScope {
        match self.role {
            Role::Client => OrgScope::client(self.organization_id, self.user_id),
            Role::Admin | Role::Staff => OrgScope::organization(self.organization_id),
        }
    }
}

fn bearer_or_cookie_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|s| s.to_string())
        .or_else(|| {
            parts
                .headers
                .get(header::COOKIE)
                .and_then(|v| v.to_str().ok())
                .and_then(|cookies| {
                    cookies.split(';').find_map(|cookie| {
                        cookie
                            .trim()
                            .strip_prefix("access_token=")
                            .map(|s| s.to_string())
                    })
                })
        })
}

fn claims_to_principal(claims: &Claims) -> Result<Principal, ApiError> {
    let user_id = ObjectId::parse_str(&claims.sub)
        .map_err(|_| ApiError::Unauthorized("Invalid user ID in token".to_string()))?;

    let role = Role::parse(&claims.role)
        .ok_or_else(|| ApiError::Unauthorized("Invalid role in token".to_string()))?;

    let organization_id = claims
        .org
        .as_deref()
        .and_then(|org| ObjectId::parse_str(org).ok())
        .ok_or_else(|| ApiError::Unauthorized("Token is not bound to an organization".to_string()))?;

    Ok(Principal {
        user_id,
        email: claims.email.clone(),
        role,
        organization_id,
    })
}

impl<S> FromRequestParts<S> for Principal
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let token = bearer_or_cookie_token(parts)
            .ok_or_else(|| ApiError::Unauthorized("No token provided".to_string()))?;

        let claims = app_state.auth.verify_access_token(&token)?;
        let principal = claims_to_principal(&claims)?;

        if !app_state
            .organizations
            .is_active(principal.organization_id)
            .await?
        {
            return Err(ApiError::Forbidden(
                "Organization is deactivated".to_string(),
            ));
        }

        Ok(principal)
    }
}

/// Helper trait for extracting AppState from composite state types
pub trait FromRef<T> {
    fn from_ref(input: &T) -> Self;
}

impl FromRef<AppState> for AppState {
    fn from_ref(input: &AppState) -> Self {
        input.clone()
    }
}
