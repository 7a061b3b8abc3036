use bson::{DateTime, doc, oid::ObjectId};
use casefolio_db::models::{Case, CaseStatus, KeyDate, Priority};
use mongodb::Database;
use serde::{Deserialize, Serialize};

use super::base::{BaseDao, DaoError, DaoResult, OrgScope, PaginatedResult, PaginationParams};

pub struct CaseDao {
    pub base: BaseDao<Case>,
    counters: mongodb::Collection<Counter>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Counter {
    #[serde(rename = "_id")]
    organization_id: ObjectId,
    seq: i64,
}

impl CaseDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Case::COLLECTION),
            counters: db.collection::<Counter>("case_counters"),
        }
    }

    /// Tenant-scoped sequence via an atomic `$inc` upsert, so concurrent
    /// creates never mint the same number.
    async fn next_case_number(&self, organization_id: ObjectId) -> DaoResult<String> {
        let counter = self
            .counters
            .find_one_and_update(
                doc! { "_id": organization_id },
                doc! { "$inc": { "seq": 1 } },
            )
            .upsert(true)
            .return_document(mongodb::options::ReturnDocument::After)
            .await?
            .ok_or(DaoError::NotFound)?;

        Ok(format!("CF-{:04}", counter.seq))
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        organization_id: ObjectId,
        title: String,
        case_type: String,
        client_id: ObjectId,
        assigned_staff_id: ObjectId,
        priority: Priority,
        due_date: Option<DateTime>,
        key_dates: Vec<KeyDate>,
    ) -> DaoResult<Case> {
        let now = DateTime::now();
        let case_number = self.next_case_number(organization_id).await?;
        let case = Case {
            id: None,
            organization_id,
            case_number,
            title,
            case_type,
            client_id,
            assigned_staff_id,
            status: CaseStatus::Intake,
            priority,
            opened_at: now,
            due_date,
            key_dates,
            drive_folder_id: None,
            notes: None,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&case).await?;
        self.base.find_by_id_scoped(doc! {}, id).await
    }

    pub async fn find_in_scope(&self, scope: &OrgScope, id: ObjectId) -> DaoResult<Case> {
        self.base
            .find_by_id_scoped(scope.filter_owned("client_id"), id)
            .await
    }

    pub async fn list_in_scope(
        &self,
        scope: &OrgScope,
        status: Option<CaseStatus>,
        params: &PaginationParams,
    ) -> DaoResult<PaginatedResult<Case>> {
        let mut filter = scope.filter_owned("client_id");
        if let Some(status) = status {
            filter.insert("status", status.as_str());
        }
        self.base.find_paginated(filter, None, params).await
    }

    /// Whitelisted field update; callers validate enum values before this
    /// point. Only admin/staff scopes reach this DAO method.
    pub async fn update_fields(
        &self,
        scope: &OrgScope,
        id: ObjectId,
        update: bson::Document,
    ) -> DaoResult<bool> {
        if update.is_empty() {
            return Ok(false);
        }
        let mut filter = scope.filter();
        filter.insert("_id", id);
        self.base.update_one(filter, doc! { "$set": update }).await
    }

    pub async fn set_drive_folder(
        &self,
        scope: &OrgScope,
        id: ObjectId,
        folder_id: String,
    ) -> DaoResult<bool> {
        let mut filter = scope.filter();
        filter.insert("_id", id);
        self.base
            .update_one(filter, doc! { "$set": { "drive_folder_id": folder_id } })
            .await
    }
}
