use bson::{DateTime, doc, oid::ObjectId};
use casefolio_db::models::{Reminder, ReminderStatus};
use mongodb::Database;

use super::base::{BaseDao, DaoResult, OrgScope};

pub struct ReminderDao {
    pub base: BaseDao<Reminder>,
}

impl ReminderDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Reminder::COLLECTION),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn schedule(
        &self,
        organization_id: ObjectId,
        case_id: ObjectId,
        key_date_label: String,
        send_at: DateTime,
        recipients: Vec<String>,
        subject: String,
        body: String,
    ) -> DaoResult<ObjectId> {
        let now = DateTime::now();
        let reminder = Reminder {
            id: None,
            organization_id,
            case_id,
            key_date_label,
            send_at,
            status: ReminderStatus::Scheduled,
            recipients,
            subject,
            body,
            provider_message_id: None,
            error: None,
            sent_at: None,
            created_at: now,
            updated_at: now,
        };
        self.base.insert_one(&reminder).await
    }

    /// Oldest-due-first batch of scheduled reminders.
    pub async fn find_due(
        &self,
        organization_filter: Option<ObjectId>,
        now: DateTime,
        batch_size: i64,
    ) -> DaoResult<Vec<Reminder>> {
        let mut filter = doc! {
            "status": "scheduled",
            "send_at": { "$lte": now },
        };
        if let Some(organization_id) = organization_filter {
            filter.insert("organization_id", organization_id);
        }
        self.base
            .find_with_limit(filter, doc! { "send_at": 1 }, batch_size)
            .await
    }

    /// Guarded transition: only a still-scheduled reminder moves to sent,
    /// so a concurrent dispatch run cannot double-deliver bookkeeping.
    pub async fn mark_sent(&self, id: ObjectId, provider_message_id: String) -> DaoResult<bool> {
        self.base
            .update_one(
                doc! { "_id": id, "status": "scheduled" },
                doc! { "$set": {
                    "status": "sent",
                    "provider_message_id": provider_message_id,
                    "sent_at": DateTime::now(),
                } },
            )
            .await
    }

    /// Terminal failure; never retried automatically.
    pub async fn mark_failed(&self, id: ObjectId, error: String) -> DaoResult<bool> {
        self.base
            .update_one(
                doc! { "_id": id, "status": "scheduled" },
                doc! { "$set": { "status": "failed", "error": error } },
            )
            .await
    }

    pub async fn list_for_case(&self, scope: &OrgScope, case_id: ObjectId) -> DaoResult<Vec<Reminder>> {
        let mut filter = scope.filter();
        filter.insert("case_id", case_id);
        self.base.find_many(filter, Some(doc! { "send_at": 1 })).await
    }
}
