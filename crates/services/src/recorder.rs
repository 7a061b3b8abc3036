use bson::oid::ObjectId;
use std::sync::Arc;
use tracing::warn;

use crate::dao::{ActivityDao, NotificationDao};

/// Best-effort side-effect recorder. Activity and notification inserts run
/// after the primary mutation has already succeeded; a failure here is
/// logged and swallowed so it can never fail the request.
#[derive(Clone)]
pub struct Recorder {
    activity: Arc<ActivityDao>,
    notifications: Arc<NotificationDao>,
}

impl Recorder {
    pub fn new(activity: Arc<ActivityDao>, notifications: Arc<NotificationDao>) -> Self {
        Self {
            activity,
            notifications,
        }
    }

    pub async fn activity(
        &self,
        organization_id: ObjectId,
        actor_id: Option<ObjectId>,
        action: &str,
        description: String,
        case_id: Option<ObjectId>,
        metadata: Option<bson::Document>,
    ) {
        if let Err(error) = self
            .activity
            .append(organization_id, actor_id, action, description, case_id, metadata)
            .await
        {
            warn!(%error, action, "Failed to record activity");
        }
    }

    pub async fn notify(
        &self,
        organization_id: ObjectId,
        recipient_id: ObjectId,
        title: String,
        body: String,
        category: &str,
        case_id: Option<ObjectId>,
    ) {
        if let Err(error) = self
            .notifications
            .create(organization_id, recipient_id, title, body, category, case_id)
            .await
        {
            warn!(%error, category, "Failed to create notification");
        }
    }
}
