use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{error::ApiError, extractors::principal::Principal, state::AppState};
use casefolio_db::models::Role;

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    #[serde(rename = "type")]
    pub report_type: String,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

pub async fn stats(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<serde_json::Value>, ApiError> {
    principal.require_role(&[Role::Admin, Role::Staff])?;

    let report = state
        .analytics
        .stats(&principal.scope(), principal.user_id)
        .await?;
    let unread_notifications = state
        .notifications
        .count_unread(&principal.scope(), principal.user_id)
        .await?;

    let mut value = serde_json::to_value(report).map_err(|e| ApiError::Internal(e.to_string()))?;
    if let Some(object) = value.as_object_mut() {
        object.insert(
            "notifications_unread".to_string(),
            serde_json::json!(unread_notifications),
        );
    }
    Ok(Json(value))
}

pub async fn dashboard(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<serde_json::Value>, ApiError> {
    principal.require_role(&[Role::Admin, Role::Staff])?;

    let report = state.analytics.dashboard(&principal.scope()).await?;
    serde_json::to_value(report)
        .map(Json)
        .map_err(|e| ApiError::Internal(e.to_string()))
}

pub async fn reports(
    State(state): State<AppState>,
    principal: Principal,
    Query(query): Query<ReportQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    principal.require_role(&[Role::Admin, Role::Staff])?;

    let report = state
        .analytics
        .report(
            &principal.scope(),
            &query.report_type,
            query.from.map(bson::DateTime::from_chrono),
            query.to.map(bson::DateTime::from_chrono),
        )
        .await?;

    serde_json::to_value(report)
        .map(Json)
        .map_err(|e| ApiError::Internal(e.to_string()))
}
