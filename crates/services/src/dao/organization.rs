use bson::{DateTime, doc, oid::ObjectId};
use casefolio_db::models::{Branding, Organization};
use mongodb::Database;

use super::base::{BaseDao, DaoError, DaoResult};

pub struct OrganizationDao {
    pub base: BaseDao<Organization>,
}

impl OrganizationDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Organization::COLLECTION),
        }
    }

    pub async fn create(&self, name: String, slug: String, is_demo: bool) -> DaoResult<Organization> {
        let now = DateTime::now();
        let organization = Organization {
            id: None,
            name,
            slug,
            is_active: true,
            branding: Branding::default(),
            is_demo,
            demo_limits: None,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&organization).await?;
        self.find_by_id(id).await
    }

    pub async fn find_by_id(&self, id: ObjectId) -> DaoResult<Organization> {
        self.base
            .find_one(doc! { "_id": id })
            .await?
            .ok_or(DaoError::NotFound)
    }

    pub async fn find_by_slug(&self, slug: &str) -> DaoResult<Organization> {
        self.base
            .find_one(doc! { "slug": slug })
            .await?
            .ok_or(DaoError::NotFound)
    }

    pub async fn is_active(&self, id: ObjectId) -> DaoResult<bool> {
        let count = self
            .base
            .count(doc! { "_id": id, "is_active": true })
            .await?;
        Ok(count > 0)
    }

    pub async fn list(&self) -> DaoResult<Vec<Organization>> {
        self.base
            .find_many(doc! {}, Some(doc! { "created_at": -1 }))
            .await
    }

    /// Deactivation is reversible; tenant data stays in place.
    pub async fn set_active(&self, id: ObjectId, is_active: bool) -> DaoResult<bool> {
        self.base
            .update_one(doc! { "_id": id }, doc! { "$set": { "is_active": is_active } })
            .await
    }
}
