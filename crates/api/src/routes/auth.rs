use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

use crate::{error::ApiError, extractors::principal::Principal, state::AppState};
use casefolio_db::models::User;
use casefolio_services::dao::base::DaoError;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub organization_id: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
}

fn to_user_response(user: &User) -> Result<UserResponse, ApiError> {
    let id = user
        .id
        .ok_or_else(|| ApiError::Internal("Loaded user has no id".to_string()))?;
    Ok(UserResponse {
        id: id.to_hex(),
        organization_id: user.organization_id.to_hex(),
        email: user.email.clone(),
        full_name: user.full_name.clone(),
        role: user.role.as_str().to_string(),
    })
}

fn session_cookie(access_token: &str, max_age: u64) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    let cookie = format!(
        "access_token={access_token}; HttpOnly; Path=/; SameSite=Lax; Max-Age={max_age}"
    );
    headers.insert(
        header::SET_COOKIE,
        cookie
            .parse()
            .map_err(|_| ApiError::Internal("Invalid cookie value".to_string()))?,
    );
    Ok(headers)
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<AuthResponse>), ApiError> {
    body.validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let limits = &state.settings.limits;
    let decision = state.rate_limiter.check(
        &format!("login:{}", body.email),
        limits.login_attempts,
        Duration::from_secs(limits.login_window_secs),
    );
    if !decision.ok {
        return Err(ApiError::TooManyRequests(
            "Too many login attempts, try again later".to_string(),
        ));
    }

    // A missing user and a wrong password are indistinguishable to callers;
    // infrastructure failures are not a credential problem.
    let user = match state.users.find_by_email(&body.email).await {
        Ok(user) => user,
        Err(DaoError::NotFound) => {
            return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
        }
        Err(err) => return Err(err.into()),
    };

    let password_hash = user
        .password_hash
        .as_ref()
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    if !state.auth.verify_password(&body.password, password_hash)? {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    if !state.organizations.is_active(user.organization_id).await? {
        return Err(ApiError::Forbidden(
            "Organization is deactivated".to_string(),
        ));
    }

    let user_id = user
        .id
        .ok_or_else(|| ApiError::Internal("Loaded user has no id".to_string()))?;
    state.users.touch_last_login(user_id).await?;

    let tokens = state
        .auth
        .generate_tokens(user_id, &user.email, user.role, user.organization_id)?;

    let headers = session_cookie(&tokens.access_token, tokens.expires_in)?;
    Ok((
        headers,
        Json(AuthResponse {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
            user: to_user_response(&user)?,
        }),
    ))
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<(HeaderMap, Json<AuthResponse>), ApiError> {
    let claims = state.auth.verify_refresh_token(&body.refresh_token)?;

    let user_id = bson::oid::ObjectId::parse_str(&claims.sub)
        .map_err(|_| ApiError::Unauthorized("Invalid user ID".to_string()))?;

    let user = state
        .users
        .base
        .find_one(bson::doc! { "_id": user_id, "is_active": true })
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    if !state.organizations.is_active(user.organization_id).await? {
        return Err(ApiError::Forbidden(
            "Organization is deactivated".to_string(),
        ));
    }

    let tokens = state
        .auth
        .generate_tokens(user_id, &user.email, user.role, user.organization_id)?;

    let headers = session_cookie(&tokens.access_token, tokens.expires_in)?;
    Ok((
        headers,
        Json(AuthResponse {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
            user: to_user_response(&user)?,
        }),
    ))
}

pub async fn logout() -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    let cookie = "access_token=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0";
    headers.insert(
        header::SET_COOKIE,
        cookie
            .parse()
            .map_err(|_| ApiError::Internal("Invalid cookie value".to_string()))?,
    );
    Ok(headers)
}

pub async fn me(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .users
        .find_in_scope(&principal.scope(), principal.user_id)
        .await?;
    Ok(Json(to_user_response(&user)?))
}
