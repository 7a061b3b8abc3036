use axum::{
    Json,
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::Response,
};
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

use crate::{error::ApiError, extractors::principal::Principal, state::AppState};
use casefolio_db::models::{Document, DocumentStatus, ReviewSummary, Role};
use casefolio_services::dao::base::PaginationParams;

const ALLOWED_CONTENT_TYPES: [&str; 6] = [
    "application/pdf",
    "image/jpeg",
    "image/png",
    "image/webp",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
];

#[derive(Debug, Deserialize, Validate)]
pub struct RequestDocumentBody {
    pub case_id: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default = "default_required")]
    pub is_required: bool,
}

fn default_required() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct UpdateDocumentBody {
    pub status: String,
    pub review_notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DocumentListQuery {
    pub case_id: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub id: String,
    pub case_id: String,
    pub client_id: String,
    pub name: String,
    pub status: String,
    pub is_required: bool,
    pub url: Option<String>,
    pub content_type: Option<String>,
    pub size: Option<u64>,
    pub review_notes: Option<String>,
    pub review_summary: Option<serde_json::Value>,
    pub created_at: String,
}

fn to_response(document: Document) -> Result<DocumentResponse, ApiError> {
    let id = document
        .id
        .ok_or_else(|| ApiError::Internal("Loaded document has no id".to_string()))?;
    Ok(DocumentResponse {
        id: id.to_hex(),
        case_id: document.case_id.to_hex(),
        client_id: document.client_id.to_hex(),
        name: document.name,
        status: document.status.as_str().to_string(),
        is_required: document.is_required,
        url: document.storage.map(|s| s.url),
        content_type: document.content_type,
        size: document.size,
        review_notes: document.review_notes,
        review_summary: document
            .review_summary
            .and_then(|s| serde_json::to_value(s).ok()),
        created_at: document
            .created_at
            .try_to_rfc3339_string()
            .unwrap_or_default(),
    })
}

fn parse_object_id(value: &str, field: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(value).map_err(|_| ApiError::BadRequest(format!("Invalid {field}")))
}

pub async fn request(
    State(state): State<AppState>,
    principal: Principal,
    Json(body): Json<RequestDocumentBody>,
) -> Result<(StatusCode, Json<DocumentResponse>), ApiError> {
    principal.require_role(&[Role::Admin, Role::Staff])?;
    body.validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let scope = principal.scope();
    let case_id = parse_object_id(&body.case_id, "case_id")?;
    let case = state.cases.find_in_scope(&scope, case_id).await?;

    let document = state
        .documents
        .create_request(
            principal.organization_id,
            case_id,
            case.client_id,
            body.name.clone(),
            body.is_required,
            principal.user_id,
        )
        .await?;
    let document_id = document
        .id
        .ok_or_else(|| ApiError::Internal("Created document has no id".to_string()))?;

    state
        .recorder
        .notify(
            principal.organization_id,
            case.client_id,
            "Document requested".to_string(),
            format!(
                "Please provide \"{}\" for case {}",
                body.name, case.case_number
            ),
            "document",
            Some(case_id),
        )
        .await;
    state
        .recorder
        .activity(
            principal.organization_id,
            Some(principal.user_id),
            "document_requested",
            format!("Requested \"{}\" on case {}", body.name, case.case_number),
            Some(case_id),
            Some(bson::doc! { "document_id": document_id }),
        )
        .await;

    Ok((StatusCode::CREATED, Json(to_response(document)?)))
}

pub async fn list(
    State(state): State<AppState>,
    principal: Principal,
    Query(query): Query<DocumentListQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let case_id = query
        .case_id
        .as_deref()
        .map(|v| parse_object_id(v, "case_id"))
        .transpose()?;

    let result = state
        .documents
        .list_in_scope(&principal.scope(), case_id, &query.pagination)
        .await?;

    let items: Vec<DocumentResponse> = result
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

pub async fn get(
    State(state): State<AppState>,
    principal: Principal,
    Path(document_id): Path<String>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let id = parse_object_id(&document_id, "document id")?;
    let document = state
        .documents
        .find_in_scope(&principal.scope(), id)
        .await?;
    Ok(Json(to_response(document)?))
}

/// Multipart upload against an existing document request. Field: `file`.
pub async fn upload(
    State(state): State<AppState>,
    principal: Principal,
    Path(document_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<DocumentResponse>, ApiError> {
    let scope = principal.scope();
    let id = parse_object_id(&document_id, "document id")?;

    let limits = &state.settings.limits;
    let decision = state.rate_limiter.check(
        &format!(
            "document_upload:{}:{}",
            principal.organization_id.to_hex(),
            principal.user_id.to_hex()
        ),
        limits.document_uploads,
        Duration::from_secs(limits.document_window_secs),
    );
    if !decision.ok {
        return Err(ApiError::TooManyRequests(
            "Too many uploads, try again later".to_string(),
        ));
    }

    let document = state.documents.find_in_scope(&scope, id).await?;

    let mut file_data: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Multipart error: {e}")))?
    {
        if field.name() == Some("file") {
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {e}")))?;
            file_data = Some((content_type, bytes.to_vec()));
        }
    }

    let (content_type, bytes) =
        file_data.ok_or_else(|| ApiError::BadRequest("Missing 'file' field".to_string()))?;

    if bytes.len() as u64 > state.settings.storage.max_upload_bytes {
        return Err(ApiError::PayloadTooLarge(format!(
            "Upload exceeds the {} byte limit",
            state.settings.storage.max_upload_bytes
        )));
    }
    if !ALLOWED_CONTENT_TYPES.contains(&content_type.as_str()) {
        return Err(ApiError::UnsupportedMediaType(format!(
            "Content type {content_type} is not accepted"
        )));
    }

    let pointer = state
        .storage
        .store(principal.organization_id, document.case_id, &bytes)
        .await?;
    let size = bytes.len() as u64;

    state
        .documents
        .attach_upload(&scope, id, principal.user_id, pointer, content_type, size)
        .await?;
    let updated = state.documents.find_in_scope(&scope, id).await?;

    state
        .recorder
        .notify(
            principal.organization_id,
            document.requested_by,
            "Document uploaded".to_string(),
            format!("\"{}\" was uploaded and awaits review", document.name),
            "document",
            Some(document.case_id),
        )
        .await;
    state
        .recorder
        .activity(
            principal.organization_id,
            Some(principal.user_id),
            "document_uploaded",
            format!("Uploaded \"{}\"", document.name),
            Some(document.case_id),
            Some(bson::doc! { "document_id": id }),
        )
        .await;

    Ok(Json(to_response(updated)?))
}

/// Staff review transition: approve, reject, or flag for action.
pub async fn update(
    State(state): State<AppState>,
    principal: Principal,
    Path(document_id): Path<String>,
    Json(body): Json<UpdateDocumentBody>,
) -> Result<Json<DocumentResponse>, ApiError> {
    principal.require_role(&[Role::Admin, Role::Staff])?;
    let scope = principal.scope();
    let id = parse_object_id(&document_id, "document id")?;

    let status = DocumentStatus::parse(&body.status)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid document status: {}", body.status)))?;

    let document = state.documents.find_in_scope(&scope, id).await?;
    state
        .documents
        .set_status(&scope, id, status, body.review_notes.clone())
        .await?;
    let updated = state.documents.find_in_scope(&scope, id).await?;

    state
        .recorder
        .notify(
            principal.organization_id,
            document.client_id,
            "Document reviewed".to_string(),
            format!("\"{}\" is now {}", document.name, status.as_str()),
            "document",
            Some(document.case_id),
        )
        .await;
    state
        .recorder
        .activity(
            principal.organization_id,
            Some(principal.user_id),
            "document_reviewed",
            format!("\"{}\" marked {}", document.name, status.as_str()),
            Some(document.case_id),
            Some(bson::doc! { "document_id": id }),
        )
        .await;

    Ok(Json(to_response(updated)?))
}

pub async fn delete(
    State(state): State<AppState>,
    principal: Principal,
    Path(document_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    principal.require_role(&[Role::Admin, Role::Staff])?;
    let scope = principal.scope();
    let id = parse_object_id(&document_id, "document id")?;

    let document = state.documents.find_in_scope(&scope, id).await?;
    if let Some(pointer) = &document.storage {
        state.storage.delete(pointer).await;
    }
    state.documents.delete_in_scope(&scope, id).await?;

    state
        .recorder
        .activity(
            principal.organization_id,
            Some(principal.user_id),
            "document_deleted",
            format!("Deleted \"{}\"", document.name),
            Some(document.case_id),
            None,
        )
        .await;

    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// Send the uploaded payload through the AI review webhook and persist the
/// returned summary.
pub async fn review(
    State(state): State<AppState>,
    principal: Principal,
    Path(document_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    principal.require_role(&[Role::Admin, Role::Staff])?;
    let scope = principal.scope();
    let id = parse_object_id(&document_id, "document id")?;

    let document = state.documents.find_in_scope(&scope, id).await?;
    let pointer = document
        .storage
        .as_ref()
        .ok_or_else(|| ApiError::BadRequest("Document has no uploaded payload".to_string()))?;
    let content_type = document
        .content_type
        .as_deref()
        .unwrap_or("application/octet-stream");

    let bytes = state.storage.read(pointer).await?;
    let outcome = state.review.review(&bytes, content_type).await?;

    let summary = ReviewSummary {
        summary: outcome.summary.clone(),
        document_type: outcome.document_type.clone(),
        confidence: outcome.confidence,
        reviewed_at: bson::DateTime::now(),
    };
    state.documents.set_review_summary(&scope, id, summary).await?;

    state
        .recorder
        .activity(
            principal.organization_id,
            Some(principal.user_id),
            "document_ai_reviewed",
            format!("AI review completed for \"{}\"", document.name),
            Some(document.case_id),
            Some(bson::doc! { "document_id": id }),
        )
        .await;

    Ok(Json(serde_json::json!({
        "summary": outcome.summary,
        "document_type": outcome.document_type,
        "confidence": outcome.confidence,
    })))
}

/// Raw payload download; the stored pointer's URL points here.
pub async fn payload(
    State(state): State<AppState>,
    principal: Principal,
    Path(storage_key): Path<String>,
) -> Result<Response, ApiError> {
    let document = state
        .documents
        .find_by_storage_key(&principal.scope(), &storage_key)
        .await?;
    let pointer = document
        .storage
        .as_ref()
        .ok_or_else(|| ApiError::NotFound("Stored payload not found".to_string()))?;

    let bytes = state.storage.read(pointer).await?;
    let content_type = document
        .content_type
        .as_deref()
        .unwrap_or("application/octet-stream");

    Response::builder()
        .header("Content-Type", content_type)
        .header(
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", document.name),
        )
        .body(Body::from(bytes))
        .map_err(|e| ApiError::Internal(e.to_string()))
}
