use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{error::ApiError, extractors::principal::Principal, state::AppState};
use casefolio_db::models::{Role, User};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
    pub role: String,
    #[validate(length(min = 8))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub is_active: bool,
}

fn to_response(user: User) -> Result<UserResponse, ApiError> {
    let id = user
        .id
        .ok_or_else(|| ApiError::Internal("Loaded user has no id".to_string()))?;
    Ok(UserResponse {
        id: id.to_hex(),
        email: user.email,
        full_name: user.full_name,
        role: user.role.as_str().to_string(),
        is_active: user.is_active,
    })
}

/// Admin provisions staff and client accounts inside their own tenant.
pub async fn create(
    State(state): State<AppState>,
    principal: Principal,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    principal.require_role(&[Role::Admin])?;
    body.validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let role = Role::parse(&body.role)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid role: {}", body.role)))?;

    let password_hash = state.auth.hash_password(&body.password)?;
    let user = state
        .users
        .create(
            principal.organization_id,
            body.email.clone(),
            body.full_name.clone(),
            role,
            password_hash,
        )
        .await?;

    state
        .recorder
        .activity(
            principal.organization_id,
            Some(principal.user_id),
            "user_created",
            format!("User {} ({}) created", body.email, role.as_str()),
            None,
            None,
        )
        .await;

    Ok((StatusCode::CREATED, Json(to_response(user)?)))
}

pub async fn list(
    State(state): State<AppState>,
    principal: Principal,
    Query(query): Query<UserListQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    principal.require_role(&[Role::Admin, Role::Staff])?;

    let role = match query.role.as_deref() {
        Some(value) => Some(
            Role::parse(value).ok_or_else(|| ApiError::BadRequest(format!("Invalid role: {value}")))?,
        ),
        None => None,
    };

    let users = state.users.list_in_scope(&principal.scope(), role).await?;
    let items: Vec<UserResponse> = users
        .into_iter()
        .map(to_response)
        .collect::<Result<_, _>>()?;

    Ok(Json(serde_json::json!({ "items": items })))
}
