use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Directional case message; `is_read` is flipped only by the receiver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub organization_id: ObjectId,
    pub case_id: ObjectId,
    pub sender_id: ObjectId,
    pub receiver_id: ObjectId,
    pub content: String,
    #[serde(default)]
    pub is_read: bool,
    pub read_at: Option<DateTime>,
    pub created_at: DateTime,
}

impl Message {
    pub const COLLECTION: &'static str = "messages";
}
