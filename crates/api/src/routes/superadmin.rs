use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use validator::Validate;

use crate::{error::ApiError, extractors::superadmin::Superadmin, state::AppState};
use casefolio_db::models::{Organization, Role};

#[derive(Debug, Deserialize)]
pub struct SuperadminLoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrganizationRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub slug: String,
    #[serde(default)]
    pub is_demo: bool,
    #[validate(email)]
    pub admin_email: String,
    #[validate(length(min = 1, max = 200))]
    pub admin_full_name: String,
    #[validate(length(min = 8))]
    pub admin_password: String,
}

#[derive(Debug, Serialize)]
pub struct OrganizationResponse {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub is_active: bool,
    pub is_demo: bool,
    pub created_at: String,
}

fn to_response(organization: Organization) -> Result<OrganizationResponse, ApiError> {
    let id = organization
        .id
        .ok_or_else(|| ApiError::Internal("Loaded organization has no id".to_string()))?;
    Ok(OrganizationResponse {
        id: id.to_hex(),
        name: organization.name,
        slug: organization.slug,
        is_active: organization.is_active,
        is_demo: organization.is_demo,
        created_at: organization
            .created_at
            .try_to_rfc3339_string()
            .unwrap_or_default(),
    })
}

/// Console login against the configured superadmin credentials. No tenant
/// user is involved; the minted token is its own short-lived scheme.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<SuperadminLoginRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    // Both fields compared in constant time, with no short circuit between
    // them.
    let superadmin = &state.settings.superadmin;
    let email_ok = body.email.as_bytes().ct_eq(superadmin.email.as_bytes());
    let password_ok = body
        .password
        .as_bytes()
        .ct_eq(superadmin.password.as_bytes());
    if (email_ok & password_ok).unwrap_u8() != 1 {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = state.auth.generate_superadmin_token(&body.email)?;
    Ok(Json(serde_json::json!({
        "token": token,
        "expires_in": superadmin.token_ttl_secs,
    })))
}

pub async fn list_organizations(
    State(state): State<AppState>,
    _superadmin: Superadmin,
) -> Result<Json<serde_json::Value>, ApiError> {
    let organizations = state.organizations.list().await?;
    let items: Vec<OrganizationResponse> = organizations
        .into_iter()
        .map(to_response)
        .collect::<Result<_, _>>()?;
    Ok(Json(serde_json::json!({ "items": items })))
}

/// Creates a tenant together with its first admin user.
pub async fn create_organization(
    State(state): State<AppState>,
    superadmin: Superadmin,
    Json(body): Json<CreateOrganizationRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    body.validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let organization = state
        .organizations
        .create(body.name.clone(), body.slug.clone(), body.is_demo)
        .await?;
    let organization_id = organization
        .id
        .ok_or_else(|| ApiError::Internal("Created organization has no id".to_string()))?;

    let password_hash = state.auth.hash_password(&body.admin_password)?;
    let admin = state
        .users
        .create(
            organization_id,
            body.admin_email.clone(),
            body.admin_full_name.clone(),
            Role::Admin,
            password_hash,
        )
        .await?;

    state
        .recorder
        .activity(
            organization_id,
            None,
            "organization_created",
            format!("Organization {} created by {}", body.name, superadmin.email),
            None,
            None,
        )
        .await;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "organization": to_response(organization)?,
            "admin": {
                "id": admin.id.map(|id| id.to_hex()),
                "email": admin.email,
                "role": admin.role.as_str(),
            },
        })),
    ))
}

pub async fn deactivate_organization(
    State(state): State<AppState>,
    _superadmin: Superadmin,
    Path(organization_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    set_active(&state, &organization_id, false).await
}

pub async fn activate_organization(
    State(state): State<AppState>,
    _superadmin: Superadmin,
    Path(organization_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    set_active(&state, &organization_id, true).await
}

async fn set_active(
    state: &AppState,
    organization_id: &str,
    is_active: bool,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = ObjectId::parse_str(organization_id)
        .map_err(|_| ApiError::BadRequest("Invalid organization id".to_string()))?;

    // 404 before toggling if the organization does not exist.
    state.organizations.find_by_id(id).await?;
    state.organizations.set_active(id, is_active).await?;

    Ok(Json(serde_json::json!({ "is_active": is_active })))
}
