use axum::{Json, extract::State};

use crate::{error::ApiError, extractors::cron::CronKey, state::AppState};

/// TTL sweep of the demo organization. Idempotent; safe to call on a tight
/// schedule.
pub async fn demo_clean(
    State(state): State<AppState>,
    _key: CronKey,
) -> Result<Json<serde_json::Value>, ApiError> {
    let demo = &state.settings.demo;
    let report = state
        .sweeper
        .sweep(demo.ttl_minutes, demo.sweep_batch_limit)
        .await?;
    serde_json::to_value(report)
        .map(Json)
        .map_err(|e| ApiError::Internal(e.to_string()))
}

/// One dispatch run over all organizations' due reminders.
pub async fn reminders(
    State(state): State<AppState>,
    _key: CronKey,
) -> Result<Json<serde_json::Value>, ApiError> {
    let report = state.dispatcher.dispatch_due(None).await?;
    serde_json::to_value(report)
        .map(Json)
        .map_err(|e| ApiError::Internal(e.to_string()))
}
