use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Append-only audit trail. Rows are never updated; only the demo sweeper
/// deletes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLog {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub organization_id: ObjectId,
    pub actor_id: Option<ObjectId>,
    /// Open enumeration, consumed by the UI for icons/labels only.
    pub action: String,
    pub description: String,
    pub case_id: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<bson::Document>,
    pub created_at: DateTime,
}

impl ActivityLog {
    pub const COLLECTION: &'static str = "activity_logs";
}
