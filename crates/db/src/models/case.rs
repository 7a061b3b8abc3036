use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Case {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub organization_id: ObjectId,
    /// Tenant-scoped human identifier, e.g. `CF-0042`.
    pub case_number: String,
    pub title: String,
    pub case_type: String,
    pub client_id: ObjectId,
    pub assigned_staff_id: ObjectId,
    #[serde(default)]
    pub status: CaseStatus,
    #[serde(default)]
    pub priority: Priority,
    pub opened_at: DateTime,
    pub due_date: Option<DateTime>,
    #[serde(default)]
    pub key_dates: Vec<KeyDate>,
    /// Best-effort Drive provisioning; a case exists without it.
    pub drive_folder_id: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    #[default]
    Intake,
    InReview,
    Filed,
    Approved,
    Denied,
    Closed,
}

impl CaseStatus {
    pub fn parse(value: &str) -> Option<CaseStatus> {
        match value {
            "intake" => Some(CaseStatus::Intake),
            "in_review" => Some(CaseStatus::InReview),
            "filed" => Some(CaseStatus::Filed),
            "approved" => Some(CaseStatus::Approved),
            "denied" => Some(CaseStatus::Denied),
            "closed" => Some(CaseStatus::Closed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Intake => "intake",
            CaseStatus::InReview => "in_review",
            CaseStatus::Filed => "filed",
            CaseStatus::Approved => "approved",
            CaseStatus::Denied => "denied",
            CaseStatus::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn parse(value: &str) -> Option<Priority> {
        match value {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            "urgent" => Some(Priority::Urgent),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

/// A named milestone date (biometrics appointment, interview, filing
/// deadline). Reminders reference the label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyDate {
    pub label: String,
    pub date: DateTime,
}

impl Case {
    pub const COLLECTION: &'static str = "cases";
}
