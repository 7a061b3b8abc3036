use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

use crate::{error::ApiError, extractors::principal::Principal, state::AppState};
use casefolio_db::models::Message;
use casefolio_services::dao::{OrgScope, base::PaginationParams};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMessageRequest {
    pub case_id: String,
    pub receiver_id: String,
    #[validate(length(min = 1, max = 5000))]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageListQuery {
    pub case_id: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: String,
    pub case_id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
    pub is_read: bool,
    pub read_at: Option<String>,
    pub created_at: String,
}

fn to_response(message: Message) -> Result<MessageResponse, ApiError> {
    let id = message
        .id
        .ok_or_else(|| ApiError::Internal("Loaded message has no id".to_string()))?;
    Ok(MessageResponse {
        id: id.to_hex(),
        case_id: message.case_id.to_hex(),
        sender_id: message.sender_id.to_hex(),
        receiver_id: message.receiver_id.to_hex(),
        content: message.content,
        is_read: message.is_read,
        read_at: message
            .read_at
            .map(|d| d.try_to_rfc3339_string().unwrap_or_default()),
        created_at: message
            .created_at
            .try_to_rfc3339_string()
            .unwrap_or_default(),
    })
}

fn parse_object_id(value: &str, field: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(value).map_err(|_| ApiError::BadRequest(format!("Invalid {field}")))
}

pub async fn list(
    State(state): State<AppState>,
    principal: Principal,
    Query(query): Query<MessageListQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let case_id = query
        .case_id
        .as_deref()
        .map(|v| parse_object_id(v, "case_id"))
        .transpose()?;

    let result = state
        .messages
        .list_in_scope(&principal.scope(), case_id, &query.pagination)
        .await?;

    let items: Vec<MessageResponse> = result
        .items
        .into_iter()
        .map(to_response)
        .collect::<Result<_, _>>()?;

    Ok(Json(serde_json::json!({
        "items": items,
        "total": result.total,
        "page": result.page,
        "per_page": result.per_page,
        "total_pages": result.total_pages,
    })))
}

pub async fn create(
    State(state): State<AppState>,
    principal: Principal,
    Json(body): Json<CreateMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    body.validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let limits = &state.settings.limits;
    let decision = state.rate_limiter.check(
        &format!(
            "message_create:{}:{}",
            principal.organization_id.to_hex(),
            principal.user_id.to_hex()
        ),
        limits.message_creates,
        Duration::from_secs(limits.message_window_secs),
    );
    if !decision.ok {
        return Err(ApiError::TooManyRequests(
            "Too many messages, try again later".to_string(),
        ));
    }

    let scope = principal.scope();
    let case_id = parse_object_id(&body.case_id, "case_id")?;
    let receiver_id = parse_object_id(&body.receiver_id, "receiver_id")?;

    // Clients can only message on their own cases (the scoped lookup 404s
    // otherwise); the receiver must exist in the same organization.
    let case = state.cases.find_in_scope(&scope, case_id).await?;
    // Receiver lookup ignores client ownership: a client may address staff,
    // but never a user outside the organization.
    let receiver_scope = OrgScope::organization(principal.organization_id);
    state.users.find_in_scope(&receiver_scope, receiver_id).await?;

    let message = state
        .messages
        .create(
            principal.organization_id,
            case_id,
            principal.user_id,
            receiver_id,
            body.content.clone(),
        )
        .await?;
    let message_id = message
        .id
        .ok_or_else(|| ApiError::Internal("Created message has no id".to_string()))?;

    state
        .recorder
        .notify(
            principal.organization_id,
            receiver_id,
            "New message".to_string(),
            format!("New message on case {}", case.case_number),
            "message",
            Some(case_id),
        )
        .await;
    state
        .recorder
        .activity(
            principal.organization_id,
            Some(principal.user_id),
            "message_sent",
            format!("Message sent on case {}", case.case_number),
            Some(case_id),
            Some(bson::doc! { "message_id": message_id }),
        )
        .await;

    Ok((StatusCode::CREATED, Json(to_response(message)?)))
}

/// Read flip: only the receiver can mark a message read; for anyone else
/// the row looks nonexistent.
pub async fn mark_read(
    State(state): State<AppState>,
    principal: Principal,
    Path(message_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_object_id(&message_id, "message id")?;

    let updated = state
        .messages
        .mark_read(&principal.scope(), id, principal.user_id)
        .await?;
    if !updated {
        return Err(ApiError::NotFound("Resource not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "read": true })))
}
