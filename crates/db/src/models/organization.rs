use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Tenant root. Every other collection carries this document's id as
/// `organization_id`; deactivation flips `is_active` instead of deleting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub slug: String,
    #[serde(default = "bool_true")]
    pub is_active: bool,
    #[serde(default)]
    pub branding: Branding,
    #[serde(default)]
    pub is_demo: bool,
    pub demo_limits: Option<DemoLimits>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Branding {
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    pub locale: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoLimits {
    pub max_cases: u32,
    pub max_documents: u32,
    pub max_messages: u32,
}

fn bool_true() -> bool {
    true
}

impl Organization {
    pub const COLLECTION: &'static str = "organizations";
}
