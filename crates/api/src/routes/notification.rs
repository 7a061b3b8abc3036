use axum::{
    Json,
    extract::{Path, Query, State},
};
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, extractors::principal::Principal, state::AppState};
use casefolio_db::models::Notification;
use casefolio_services::dao::base::PaginationParams;

#[derive(Debug, Deserialize)]
pub struct NotificationListQuery {
    #[serde(default)]
    pub unread_only: bool,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub id: String,
    pub title: String,
    pub body: String,
    pub category: String,
    pub case_id: Option<String>,
    pub is_read: bool,
    pub created_at: String,
}

fn to_response(notification: Notification) -> Result<NotificationResponse, ApiError> {
    let id = notification
        .id
        .ok_or_else(|| ApiError::Internal("Loaded notification has no id".to_string()))?;
    Ok(NotificationResponse {
        id: id.to_hex(),
        title: notification.title,
        body: notification.body,
        category: notification.category,
        case_id: notification.case_id.map(|id| id.to_hex()),
        is_read: notification.is_read,
        created_at: notification
            .created_at
            .try_to_rfc3339_string()
            .unwrap_or_default(),
    })
}

pub async fn list(
    State(state): State<AppState>,
    principal: Principal,
    Query(query): Query<NotificationListQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let scope = principal.scope();
    let result = state
        .notifications
        .list_for_user(
            &scope,
            principal.user_id,
            query.unread_only,
            &query.pagination,
        )
        .await?;
    let unread = state
        .notifications
        .count_unread(&scope, principal.user_id)
        .await?;

    let items: Vec<NotificationResponse> = result
        .items
        .into_iter()
        .map(to_response)
        .collect::<Result<_, _>>()?;

    Ok(Json(serde_json::json!({
        "items": items,
        "total": result.total,
        "unread": unread,
        "page": result.page,
        "per_page": result.per_page,
        "total_pages": result.total_pages,
    })))
}

pub async fn mark_read(
    State(state): State<AppState>,
    principal: Principal,
    Path(notification_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = ObjectId::parse_str(&notification_id)
        .map_err(|_| ApiError::BadRequest("Invalid notification id".to_string()))?;

    let updated = state
        .notifications
        .mark_read(&principal.scope(), id, principal.user_id)
        .await?;
    if !updated {
        return Err(ApiError::NotFound("Resource not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "read": true })))
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<serde_json::Value>, ApiError> {
    let updated = state
        .notifications
        .mark_all_read(&principal.scope(), principal.user_id)
        .await?;
    Ok(Json(serde_json::json!({ "updated": updated })))
}
