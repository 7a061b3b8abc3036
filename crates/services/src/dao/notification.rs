use bson::{DateTime, doc, oid::ObjectId};
use casefolio_db::models::Notification;
use mongodb::Database;

use super::base::{BaseDao, DaoResult, OrgScope, PaginatedResult, PaginationParams};

pub struct NotificationDao {
    pub base: BaseDao<Notification>,
}

impl NotificationDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Notification::COLLECTION),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        organization_id: ObjectId,
        user_id: ObjectId,
        title: String,
        body: String,
        category: &str,
        case_id: Option<ObjectId>,
    ) -> DaoResult<ObjectId> {
        let notification = Notification {
            id: None,
            organization_id,
            user_id,
            title,
            body,
            category: category.to_string(),
            case_id,
            is_read: false,
            read_at: None,
            created_at: DateTime::now(),
        };
        self.base.insert_one(&notification).await
    }

    /// A user only ever sees their own notifications, whatever their role.
    pub async fn list_for_user(
        &self,
        scope: &OrgScope,
        user_id: ObjectId,
        unread_only: bool,
        params: &PaginationParams,
    ) -> DaoResult<PaginatedResult<Notification>> {
        let mut filter = scope.filter();
        filter.insert("user_id", user_id);
        if unread_only {
            filter.insert("is_read", false);
        }
        self.base.find_paginated(filter, None, params).await
    }

    pub async fn mark_read(
        &self,
        scope: &OrgScope,
        id: ObjectId,
        user_id: ObjectId,
    ) -> DaoResult<bool> {
        let mut filter = scope.filter();
        filter.insert("_id", id);
        filter.insert("user_id", user_id);
        self.base
            .update_one(
                filter,
                doc! { "$set": { "is_read": true, "read_at": DateTime::now() } },
            )
            .await
    }

    pub async fn mark_all_read(&self, scope: &OrgScope, user_id: ObjectId) -> DaoResult<u64> {
        let mut filter = scope.filter();
        filter.insert("user_id", user_id);
        filter.insert("is_read", false);
        self.base
            .update_many(
                filter,
                doc! { "$set": { "is_read": true, "read_at": DateTime::now() } },
            )
            .await
    }

    pub async fn count_unread(&self, scope: &OrgScope, user_id: ObjectId) -> DaoResult<u64> {
        let mut filter = scope.filter();
        filter.insert("user_id", user_id);
        filter.insert("is_read", false);
        self.base.count(filter).await
    }
}
