use bson::{DateTime, doc, oid::ObjectId};
use casefolio_db::models::{Document, DocumentStatus, ReviewSummary, StoragePointer};
use mongodb::Database;

use super::base::{BaseDao, DaoResult, OrgScope, PaginatedResult, PaginationParams};

pub struct DocumentDao {
    pub base: BaseDao<Document>,
}

impl DocumentDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Document::COLLECTION),
        }
    }

    /// A staff request for a document the client must provide.
    pub async fn create_request(
        &self,
        organization_id: ObjectId,
        case_id: ObjectId,
        client_id: ObjectId,
        name: String,
        is_required: bool,
        requested_by: ObjectId,
    ) -> DaoResult<Document> {
        let now = DateTime::now();
        let document = Document {
            id: None,
            organization_id,
            case_id,
            client_id,
            name,
            status: DocumentStatus::Pending,
            is_required,
            requested_by,
            uploaded_by: None,
            storage: None,
            content_type: None,
            size: None,
            review_notes: None,
            review_summary: None,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&document).await?;
        self.base.find_by_id_scoped(doc! {}, id).await
    }

    pub async fn find_in_scope(&self, scope: &OrgScope, id: ObjectId) -> DaoResult<Document> {
        self.base
            .find_by_id_scoped(scope.filter_owned("client_id"), id)
            .await
    }

    /// Payload download lookup. The storage key is opaque and unguessable,
    /// but the scope filter still applies.
    pub async fn find_by_storage_key(
        &self,
        scope: &OrgScope,
        storage_key: &str,
    ) -> DaoResult<Document> {
        let mut filter = scope.filter_owned("client_id");
        filter.insert("storage.storage_key", storage_key);
        self.base
            .find_one(filter)
            .await?
            .ok_or(super::base::DaoError::NotFound)
    }

    pub async fn list_in_scope(
        &self,
        scope: &OrgScope,
        case_id: Option<ObjectId>,
        params: &PaginationParams,
    ) -> DaoResult<PaginatedResult<Document>> {
        let mut filter = scope.filter_owned("client_id");
        if let Some(case_id) = case_id {
            filter.insert("case_id", case_id);
        }
        self.base.find_paginated(filter, None, params).await
    }

    pub async fn attach_upload(
        &self,
        scope: &OrgScope,
        id: ObjectId,
        uploaded_by: ObjectId,
        storage: StoragePointer,
        content_type: String,
        size: u64,
    ) -> DaoResult<bool> {
        let mut filter = scope.filter_owned("client_id");
        filter.insert("_id", id);
        self.base
            .update_one(
                filter,
                doc! { "$set": {
                    "status": DocumentStatus::Submitted.as_str(),
                    "uploaded_by": uploaded_by,
                    "storage": bson::to_bson(&storage)?,
                    "content_type": content_type,
                    "size": size as i64,
                } },
            )
            .await
    }

    /// Staff review transition. Last write wins on concurrent updates.
    pub async fn set_status(
        &self,
        scope: &OrgScope,
        id: ObjectId,
        status: DocumentStatus,
        review_notes: Option<String>,
    ) -> DaoResult<bool> {
        let mut filter = scope.filter();
        filter.insert("_id", id);

        let mut set = doc! { "status": status.as_str() };
        if let Some(notes) = review_notes {
            set.insert("review_notes", notes);
        }
        self.base.update_one(filter, doc! { "$set": set }).await
    }

    pub async fn set_review_summary(
        &self,
        scope: &OrgScope,
        id: ObjectId,
        summary: ReviewSummary,
    ) -> DaoResult<bool> {
        let mut filter = scope.filter();
        filter.insert("_id", id);
        self.base
            .update_one(
                filter,
                doc! { "$set": { "review_summary": bson::to_bson(&summary)? } },
            )
            .await
    }

    pub async fn delete_in_scope(&self, scope: &OrgScope, id: ObjectId) -> DaoResult<u64> {
        let mut filter = scope.filter();
        filter.insert("_id", id);
        self.base.hard_delete(filter).await
    }
}
