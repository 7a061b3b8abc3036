use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use bson::{doc, oid::ObjectId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{error::ApiError, extractors::principal::Principal, state::AppState};
use casefolio_db::models::{Case, CaseStatus, KeyDate, Priority, Role};
use casefolio_services::dao::base::PaginationParams;

#[derive(Debug, Deserialize)]
pub struct CaseListQuery {
    pub status: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Deserialize)]
pub struct KeyDateInput {
    pub label: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCaseRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 100))]
    pub case_type: String,
    pub client_id: String,
    pub assigned_staff_id: String,
    pub priority: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub key_dates: Vec<KeyDateInput>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCaseRequest {
    pub title: Option<String>,
    pub case_type: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assigned_staff_id: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CaseResponse {
    pub id: String,
    pub case_number: String,
    pub title: String,
    pub case_type: String,
    pub client_id: String,
    pub assigned_staff_id: String,
    pub status: String,
    pub priority: String,
    pub opened_at: String,
    pub due_date: Option<String>,
    pub key_dates: Vec<KeyDateResponse>,
    pub drive_folder_id: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct KeyDateResponse {
    pub label: String,
    pub date: String,
}

fn to_response(case: Case) -> Result<CaseResponse, ApiError> {
    let id = case
        .id
        .ok_or_else(|| ApiError::Internal("Loaded case has no id".to_string()))?;
    Ok(CaseResponse {
        id: id.to_hex(),
        case_number: case.case_number,
        title: case.title,
        case_type: case.case_type,
        client_id: case.client_id.to_hex(),
        assigned_staff_id: case.assigned_staff_id.to_hex(),
        status: case.status.as_str().to_string(),
        priority: case.priority.as_str().to_string(),
        opened_at: case.opened_at.try_to_rfc3339_string().unwrap_or_default(),
        due_date: case
            .due_date
            .map(|d| d.try_to_rfc3339_string().unwrap_or_default()),
        key_dates: case
            .key_dates
            .into_iter()
            .map(|kd| KeyDateResponse {
                label: kd.label,
                date: kd.date.try_to_rfc3339_string().unwrap_or_default(),
            })
            .collect(),
        drive_folder_id: case.drive_folder_id,
        notes: case.notes,
        created_at: case.created_at.try_to_rfc3339_string().unwrap_or_default(),
    })
}

fn parse_object_id(value: &str, field: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(value).map_err(|_| ApiError::BadRequest(format!("Invalid {field}")))
}

fn parse_status(value: &str) -> Result<CaseStatus, ApiError> {
    CaseStatus::parse(value)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid case status: {value}")))
}

fn parse_priority(value: &str) -> Result<Priority, ApiError> {
    Priority::parse(value).ok_or_else(|| ApiError::BadRequest(format!("Invalid priority: {value}")))
}

pub async fn list(
    State(state): State<AppState>,
    principal: Principal,
    Query(query): Query<CaseListQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let status = query.status.as_deref().map(parse_status).transpose()?;

    let result = state
        .cases
        .list_in_scope(&principal.scope(), status, &query.pagination)
        .await?;

    let items: Vec<CaseResponse> = result
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
    Json(body): Json<CreateCaseRequest>,
) -> Result<(StatusCode, Json<CaseResponse>), ApiError> {
    principal.require_role(&[Role::Admin, Role::Staff])?;
    body.validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let scope = principal.scope();
    let client_id = parse_object_id(&body.client_id, "client_id")?;
    let staff_id = parse_object_id(&body.assigned_staff_id, "assigned_staff_id")?;

    let client = state.users.find_in_scope(&scope, client_id).await?;
    if client.role != Role::Client {
        return Err(ApiError::BadRequest(
            "client_id must reference a client-role user".to_string(),
        ));
    }
    let staff = state.users.find_in_scope(&scope, staff_id).await?;
    if staff.role == Role::Client {
        return Err(ApiError::BadRequest(
            "assigned_staff_id must reference a staff or admin user".to_string(),
        ));
    }

    let priority = match body.priority.as_deref() {
        Some(value) => parse_priority(value)?,
        None => Priority::Medium,
    };

    let key_dates: Vec<KeyDate> = body
        .key_dates
        .iter()
        .map(|kd| KeyDate {
            label: kd.label.clone(),
            date: bson::DateTime::from_chrono(kd.date),
        })
        .collect();

    let case = state
        .cases
        .create(
            principal.organization_id,
            body.title.clone(),
            body.case_type.clone(),
            client_id,
            staff_id,
            priority,
            body.due_date.map(bson::DateTime::from_chrono),
            key_dates,
        )
        .await?;
    let case_id = case
        .id
        .ok_or_else(|| ApiError::Internal("Created case has no id".to_string()))?;

    // Best-effort Drive folder; the case exists either way.
    let mut case = case;
    if state.drive.is_configured() {
        let folder_name = format!("{} {}", case.case_number, case.title);
        if let Some(folder_id) = state.drive.provision_case_folder(&folder_name).await {
            state
                .cases
                .set_drive_folder(&scope, case_id, folder_id.clone())
                .await?;
            case.drive_folder_id = Some(folder_id);
        }
    }

    // One reminder per key date, addressed to the client.
    for kd in &case.key_dates {
        state
            .reminders
            .schedule(
                principal.organization_id,
                case_id,
                kd.label.clone(),
                kd.date,
                vec![client.email.clone()],
                format!("Upcoming: {} ({})", kd.label, case.case_number),
                format!(
                    "This is a reminder that \"{}\" for case {} is due.",
                    kd.label, case.case_number
                ),
            )
            .await?;
    }

    state
        .recorder
        .activity(
            principal.organization_id,
            Some(principal.user_id),
            "case_created",
            format!("Case {} created", case.case_number),
            Some(case_id),
            None,
        )
        .await;
    state
        .recorder
        .notify(
            principal.organization_id,
            client_id,
            "New case opened".to_string(),
            format!("Case {} ({}) has been opened for you", case.case_number, case.title),
            "case",
            Some(case_id),
        )
        .await;

    Ok((StatusCode::CREATED, Json(to_response(case)?)))
}

pub async fn get(
    State(state): State<AppState>,
    principal: Principal,
    Path(case_id): Path<String>,
) -> Result<Json<CaseResponse>, ApiError> {
    let id = parse_object_id(&case_id, "case id")?;
    let case = state.cases.find_in_scope(&principal.scope(), id).await?;
    Ok(Json(to_response(case)?))
}

pub async fn update(
    State(state): State<AppState>,
    principal: Principal,
    Path(case_id): Path<String>,
    Json(body): Json<UpdateCaseRequest>,
) -> Result<Json<CaseResponse>, ApiError> {
    principal.require_role(&[Role::Admin, Role::Staff])?;
    let scope = principal.scope();
    let id = parse_object_id(&case_id, "case id")?;

    let before = state.cases.find_in_scope(&scope, id).await?;

    let mut set = bson::Document::new();
    if let Some(title) = &body.title {
        set.insert("title", title);
    }
    if let Some(case_type) = &body.case_type {
        set.insert("case_type", case_type);
    }
    if let Some(status) = body.status.as_deref() {
        set.insert("status", parse_status(status)?.as_str());
    }
    if let Some(priority) = body.priority.as_deref() {
        set.insert("priority", parse_priority(priority)?.as_str());
    }
    if let Some(staff_id) = body.assigned_staff_id.as_deref() {
        let staff_id = parse_object_id(staff_id, "assigned_staff_id")?;
        let staff = state.users.find_in_scope(&scope, staff_id).await?;
        if staff.role == Role::Client {
            return Err(ApiError::BadRequest(
                "assigned_staff_id must reference a staff or admin user".to_string(),
            ));
        }
        set.insert("assigned_staff_id", staff_id);
    }
    if let Some(due_date) = body.due_date {
        set.insert("due_date", bson::DateTime::from_chrono(due_date));
    }
    if let Some(notes) = &body.notes {
        set.insert("notes", notes);
    }

    if set.is_empty() {
        return Err(ApiError::BadRequest("No updatable fields given".to_string()));
    }

    state.cases.update_fields(&scope, id, set).await?;
    let case = state.cases.find_in_scope(&scope, id).await?;

    state
        .recorder
        .activity(
            principal.organization_id,
            Some(principal.user_id),
            "case_updated",
            format!("Case {} updated", case.case_number),
            Some(id),
            None,
        )
        .await;

    if case.status != before.status {
        state
            .recorder
            .notify(
                principal.organization_id,
                case.client_id,
                "Case status changed".to_string(),
                format!(
                    "Case {} moved to {}",
                    case.case_number,
                    case.status.as_str()
                ),
                "case",
                Some(id),
            )
            .await;
    }

    Ok(Json(to_response(case)?))
}

/// Status transition alias: `PATCH /cases/{id}/stages/{stage}`.
pub async fn set_stage(
    State(state): State<AppState>,
    principal: Principal,
    Path((case_id, stage)): Path<(String, String)>,
) -> Result<Json<CaseResponse>, ApiError> {
    update(
        State(state),
        principal,
        Path(case_id),
        Json(UpdateCaseRequest {
            title: None,
            case_type: None,
            status: Some(stage),
            priority: None,
            assigned_staff_id: None,
            due_date: None,
            notes: None,
        }),
    )
    .await
}

pub async fn reminders(
    State(state): State<AppState>,
    principal: Principal,
    Path(case_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    principal.require_role(&[Role::Admin, Role::Staff])?;
    let scope = principal.scope();
    let id = parse_object_id(&case_id, "case id")?;

    // 404 before listing if the case is out of scope.
    state.cases.find_in_scope(&scope, id).await?;
    let reminders = state.reminders.list_for_case(&scope, id).await?;

    let items: Vec<serde_json::Value> = reminders
        .into_iter()
        .map(|r| {
            serde_json::json!({
                "id": r.id.map(|id| id.to_hex()),
                "key_date_label": r.key_date_label,
                "send_at": r.send_at.try_to_rfc3339_string().unwrap_or_default(),
                "status": r.status.as_str(),
                "recipients": r.recipients,
                "subject": r.subject,
                "error": r.error,
                "sent_at": r.sent_at.map(|d| d.try_to_rfc3339_string().unwrap_or_default()),
            })
        })
        .collect();

    Ok(Json(serde_json::json!({ "items": items })))
}
