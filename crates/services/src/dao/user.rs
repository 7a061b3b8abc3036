use bson::{DateTime, doc, oid::ObjectId};
use casefolio_db::models::{Role, User};
use mongodb::Database;

use super::base::{BaseDao, DaoError, DaoResult, OrgScope};

pub struct UserDao {
    pub base: BaseDao<User>,
}

impl UserDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, User::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        organization_id: ObjectId,
        email: String,
        full_name: String,
        role: Role,
        password_hash: String,
    ) -> DaoResult<User> {
        let now = DateTime::now();
        let user = User {
            id: None,
            organization_id,
            email,
            full_name,
            role,
            password_hash: Some(password_hash),
            phone: None,
            is_active: true,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&user).await?;
        self.base
            .find_one(doc! { "_id": id })
            .await?
            .ok_or(DaoError::NotFound)
    }

    /// Login lookup; not tenant-scoped because email is globally unique.
    pub async fn find_by_email(&self, email: &str) -> DaoResult<User> {
        self.base
            .find_one(doc! { "email": email, "is_active": true })
            .await?
            .ok_or(DaoError::NotFound)
    }

    pub async fn find_in_scope(&self, scope: &OrgScope, id: ObjectId) -> DaoResult<User> {
        self.base.find_by_id_scoped(scope.filter(), id).await
    }

    pub async fn list_in_scope(&self, scope: &OrgScope, role: Option<Role>) -> DaoResult<Vec<User>> {
        let mut filter = scope.filter();
        if let Some(role) = role {
            filter.insert("role", role.as_str());
        }
        self.base
            .find_many(filter, Some(doc! { "full_name": 1 }))
            .await
    }

    pub async fn touch_last_login(&self, id: ObjectId) -> DaoResult<bool> {
        self.base
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "last_login_at": DateTime::now() } },
            )
            .await
    }
}
