use bson::{DateTime, doc, oid::ObjectId};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::dao::{
    ActivityDao, DaoResult, DocumentDao, MessageDao, NotificationDao, OrganizationDao,
};
use crate::storage::DocumentStorage;

/// TTL cleanup for the demo tenant. Each run deletes at most `batch_limit`
/// rows per collection, strictly older than the cutoff; re-running with no
/// eligible rows is a no-op. New rows are never touched, so the sweep is
/// safe against concurrent demo writes.
pub struct DemoSweeper {
    organizations: Arc<OrganizationDao>,
    documents: Arc<DocumentDao>,
    messages: Arc<MessageDao>,
    notifications: Arc<NotificationDao>,
    activity: Arc<ActivityDao>,
    storage: DocumentStorage,
    demo_slug: String,
}

#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct SweepReport {
    pub documents_deleted: u64,
    pub messages_deleted: u64,
    pub notifications_deleted: u64,
    pub activity_logs_deleted: u64,
}

/// Strict `<` comparison: rows exactly at the TTL boundary survive this run.
pub fn sweep_cutoff(now: DateTime, ttl_minutes: i64) -> DateTime {
    DateTime::from_millis(now.timestamp_millis() - ttl_minutes * 60 * 1000)
}

impl DemoSweeper {
    pub fn new(
        organizations: Arc<OrganizationDao>,
        documents: Arc<DocumentDao>,
        messages: Arc<MessageDao>,
        notifications: Arc<NotificationDao>,
        activity: Arc<ActivityDao>,
        storage: DocumentStorage,
        demo_slug: String,
    ) -> Self {
        Self {
            organizations,
            documents,
            messages,
            notifications,
            activity,
            storage,
            demo_slug,
        }
    }

    pub async fn sweep(&self, ttl_minutes: i64, batch_limit: i64) -> DaoResult<SweepReport> {
        let organization = match self.organizations.find_by_slug(&self.demo_slug).await {
            Ok(org) if org.is_demo => org,
            Ok(_) => {
                warn!(slug = %self.demo_slug, "Configured demo slug is not a demo organization, skipping sweep");
                return Ok(SweepReport::default());
            }
            Err(_) => {
                info!(slug = %self.demo_slug, "No demo organization found, nothing to sweep");
                return Ok(SweepReport::default());
            }
        };
        let Some(organization_id) = organization.id else {
            return Ok(SweepReport::default());
        };

        let cutoff = sweep_cutoff(DateTime::now(), ttl_minutes);
        let expired = doc! {
            "organization_id": organization_id,
            "created_at": { "$lt": cutoff },
        };

        let mut report = SweepReport::default();

        // Documents first: payloads go before rows, best-effort.
        let stale_documents = self
            .documents
            .base
            .find_with_limit(expired.clone(), doc! { "created_at": 1 }, batch_limit)
            .await?;
        if !stale_documents.is_empty() {
            let mut ids: Vec<ObjectId> = Vec::with_capacity(stale_documents.len());
            for document in &stale_documents {
                if let Some(pointer) = &document.storage {
                    self.storage.delete(pointer).await;
                }
                if let Some(id) = document.id {
                    ids.push(id);
                }
            }
            report.documents_deleted = self
                .documents
                .base
                .hard_delete(doc! { "_id": { "$in": ids } })
                .await?;
        }

        report.messages_deleted = self
            .delete_batch(&self.messages.base, expired.clone(), batch_limit)
            .await?;
        report.notifications_deleted = self
            .delete_batch(&self.notifications.base, expired.clone(), batch_limit)
            .await?;
        report.activity_logs_deleted = self
            .delete_batch(&self.activity.base, expired, batch_limit)
            .await?;

        info!(
            documents = report.documents_deleted,
            messages = report.messages_deleted,
            notifications = report.notifications_deleted,
            activity_logs = report.activity_logs_deleted,
            "Demo sweep completed"
        );

        Ok(report)
    }

    /// Select ids first, then delete by id set, so the batch limit holds
    /// even while new rows keep arriving.
    async fn delete_batch<T>(
        &self,
        dao: &crate::dao::base::BaseDao<T>,
        filter: bson::Document,
        batch_limit: i64,
    ) -> DaoResult<u64>
    where
        T: serde::Serialize + for<'de> serde::Deserialize<'de> + Unpin + Send + Sync,
    {
        let ids = self.collect_ids(dao, filter, batch_limit).await?;
        if ids.is_empty() {
            return Ok(0);
        }
        dao.hard_delete(doc! { "_id": { "$in": ids } }).await
    }

    async fn collect_ids<T>(
        &self,
        dao: &crate::dao::base::BaseDao<T>,
        filter: bson::Document,
        batch_limit: i64,
    ) -> DaoResult<Vec<ObjectId>>
    where
        T: serde::Serialize + for<'de> serde::Deserialize<'de> + Unpin + Send + Sync,
    {
        use futures::TryStreamExt;
        let mut cursor = dao
            .collection()
            .clone_with_type::<bson::Document>()
            .find(filter)
            .projection(doc! { "_id": 1 })
            .sort(doc! { "created_at": 1 })
            .limit(batch_limit)
            .await?;

        let mut ids = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            if let Ok(id) = document.get_object_id("_id") {
                ids.push(id);
            }
        }
        Ok(ids)
    }
}
