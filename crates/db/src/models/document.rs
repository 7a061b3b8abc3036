use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub organization_id: ObjectId,
    pub case_id: ObjectId,
    /// Denormalized from the case so client ownership can be enforced in
    /// the query filter itself.
    pub client_id: ObjectId,
    pub name: String,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default = "bool_true")]
    pub is_required: bool,
    pub requested_by: ObjectId,
    pub uploaded_by: Option<ObjectId>,
    pub storage: Option<StoragePointer>,
    pub content_type: Option<String>,
    pub size: Option<u64>,
    pub review_notes: Option<String>,
    pub review_summary: Option<ReviewSummary>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    #[default]
    Pending,
    Submitted,
    Approved,
    Rejected,
    RequiresAction,
    NotRequired,
}

impl DocumentStatus {
    pub fn parse(value: &str) -> Option<DocumentStatus> {
        match value {
            "pending" => Some(DocumentStatus::Pending),
            "submitted" => Some(DocumentStatus::Submitted),
            "approved" => Some(DocumentStatus::Approved),
            "rejected" => Some(DocumentStatus::Rejected),
            "requires_action" => Some(DocumentStatus::RequiresAction),
            "not_required" => Some(DocumentStatus::NotRequired),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "pending",
            DocumentStatus::Submitted => "submitted",
            DocumentStatus::Approved => "approved",
            DocumentStatus::Rejected => "rejected",
            DocumentStatus::RequiresAction => "requires_action",
            DocumentStatus::NotRequired => "not_required",
        }
    }
}

/// Pointer into external object storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoragePointer {
    pub provider: String,
    pub storage_key: String,
    pub url: String,
}

/// Result of the AI document review webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub summary: String,
    pub document_type: Option<String>,
    pub confidence: f64,
    pub reviewed_at: DateTime,
}

fn bool_true() -> bool {
    true
}

impl Document {
    pub const COLLECTION: &'static str = "documents";
}
