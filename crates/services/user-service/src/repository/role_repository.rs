//! Role repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use super::entities::role::{self, ActiveModel, Entity as RoleEntity};
use super::entities::user_role;
use common::{AppError, AppResult};
use domain::Role;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

pub(crate) fn duplicate_name(name: &str) -> AppError {
    AppError::DuplicateName(format!("Role '{}' already exists", name))
}

/// Role repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>>;

    async fn list(&self) -> AppResult<Vec<Role>>;

    async fn create(&self, name: String) -> AppResult<Role>;

    /// Delete the role and every membership that grants it
    async fn delete(&self, id: i64) -> AppResult<()>;
}

/// SeaORM-backed role repository
pub struct RoleStore {
    db: DatabaseConnection,
}

impl RoleStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RoleRepository for RoleStore {
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        let result = RoleEntity::find()
            .filter(role::Column::Name.eq(name))
            .one(&self.db)
            .await?;
        Ok(result.map(Role::from))
    }

    async fn list(&self) -> AppResult<Vec<Role>> {
        let models = RoleEntity::find()
            .order_by_asc(role::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Role::from).collect())
    }

    async fn create(&self, name: String) -> AppResult<Role> {
        let active_model = ActiveModel {
            name: Set(name.clone()),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| AppError::from_db_unique(e, || duplicate_name(&name)))?;
        Ok(Role::from(model))
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let txn = self.db.begin().await?;

        let memberships = user_role::Entity::delete_many()
            .filter(user_role::Column::RoleId.eq(id))
            .exec(&txn)
            .await?;
        let result = RoleEntity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(AppError::not_found("Role", id));
        }

        txn.commit().await?;
        tracing::debug!(
            role_id = id,
            revoked = memberships.rows_affected,
            "Role memberships removed"
        );
        Ok(())
    }
}
