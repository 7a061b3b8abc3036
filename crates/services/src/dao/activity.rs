use bson::{DateTime, doc, oid::ObjectId};
use casefolio_db::models::ActivityLog;
use mongodb::Database;

use super::base::{BaseDao, DaoResult, OrgScope};

/// Append-only: this DAO exposes no update path. Deletion exists solely
/// for the demo sweeper.
pub struct ActivityDao {
    pub base: BaseDao<ActivityLog>,
}

impl ActivityDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, ActivityLog::COLLECTION),
        }
    }

    pub async fn append(
        &self,
        organization_id: ObjectId,
        actor_id: Option<ObjectId>,
        action: &str,
        description: String,
        case_id: Option<ObjectId>,
        metadata: Option<bson::Document>,
    ) -> DaoResult<ObjectId> {
        let entry = ActivityLog {
            id: None,
            organization_id,
            actor_id,
            action: action.to_string(),
            description,
            case_id,
            metadata,
            created_at: DateTime::now(),
        };
        self.base.insert_one(&entry).await
    }

    pub async fn recent(&self, scope: &OrgScope, limit: i64) -> DaoResult<Vec<ActivityLog>> {
        self.base
            .find_with_limit(scope.filter(), doc! { "created_at": -1 }, limit)
            .await
    }
}
