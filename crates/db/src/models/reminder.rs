use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// One scheduled email for a case key date. Exactly one delivery attempt:
/// `scheduled -> sent` or `scheduled -> failed`, with no automatic retry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub organization_id: ObjectId,
    pub case_id: ObjectId,
    pub key_date_label: String,
    pub send_at: DateTime,
    #[serde(default)]
    pub status: ReminderStatus,
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
    pub provider_message_id: Option<String>,
    pub error: Option<String>,
    pub sent_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReminderStatus {
    #[default]
    Scheduled,
    Sent,
    Failed,
}

impl ReminderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderStatus::Scheduled => "scheduled",
            ReminderStatus::Sent => "sent",
            ReminderStatus::Failed => "failed",
        }
    }
}

impl Reminder {
    pub const COLLECTION: &'static str = "reminders";
}
