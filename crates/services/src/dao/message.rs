use bson::{DateTime, doc, oid::ObjectId};
use casefolio_db::models::Message;
use mongodb::Database;

use super::base::{BaseDao, DaoResult, OrgScope, PaginatedResult, PaginationParams};

pub struct MessageDao {
    pub base: BaseDao<Message>,
}

impl MessageDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Message::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        organization_id: ObjectId,
        case_id: ObjectId,
        sender_id: ObjectId,
        receiver_id: ObjectId,
        content: String,
    ) -> DaoResult<Message> {
        let message = Message {
            id: None,
            organization_id,
            case_id,
            sender_id,
            receiver_id,
            content,
            is_read: false,
            read_at: None,
            created_at: DateTime::now(),
        };

        let id = self.base.insert_one(&message).await?;
        self.base.find_by_id_scoped(doc! {}, id).await
    }

    pub async fn list_in_scope(
        &self,
        scope: &OrgScope,
        case_id: Option<ObjectId>,
        params: &PaginationParams,
    ) -> DaoResult<PaginatedResult<Message>> {
        let mut filter = scope.filter_party(&["sender_id", "receiver_id"]);
        if let Some(case_id) = case_id {
            filter.insert("case_id", case_id);
        }
        self.base.find_paginated(filter, None, params).await
    }

    /// Read flag flips only when the caller is the receiver; for anyone
    /// else the filter misses and the row looks nonexistent.
    pub async fn mark_read(
        &self,
        scope: &OrgScope,
        id: ObjectId,
        receiver_id: ObjectId,
    ) -> DaoResult<bool> {
        let mut filter = scope.filter();
        filter.insert("_id", id);
        filter.insert("receiver_id", receiver_id);
        self.base
            .update_one(
                filter,
                doc! { "$set": { "is_read": true, "read_at": DateTime::now() } },
            )
            .await
    }

    pub async fn count_unread(&self, scope: &OrgScope, receiver_id: ObjectId) -> DaoResult<u64> {
        let mut filter = scope.filter();
        filter.insert("receiver_id", receiver_id);
        filter.insert("is_read", false);
        self.base.count(filter).await
    }
}
