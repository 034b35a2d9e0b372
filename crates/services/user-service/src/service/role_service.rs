//! Role service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use common::AppResult;
use domain::error::check_id;
use domain::{validate_role_name, Role};

use crate::repository::{duplicate_role_name, RoleRepository};

/// Role service trait for dependency injection.
#[async_trait]
pub trait RoleService: Send + Sync {
    async fn create_role(&self, name: String) -> AppResult<Role>;

    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    /// Revokes the role from every user that holds it
    async fn delete_role(&self, id: i64) -> AppResult<()>;
}

pub struct RoleManager {
    repo: Arc<dyn RoleRepository>,
}

impl RoleManager {
    pub fn new(repo: Arc<dyn RoleRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl RoleService for RoleManager {
    async fn create_role(&self, name: String) -> AppResult<Role> {
        validate_role_name(&name)?;

        if self.repo.find_by_name(&name).await?.is_some() {
            warn!(role = %name, "Rejected duplicate role name");
            return Err(duplicate_role_name(&name));
        }

        let role = self.repo.create(name).await?;
        info!(role_id = role.id, role = %role.name, "Role created");
        Ok(role)
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        self.repo.list().await
    }

    async fn delete_role(&self, id: i64) -> AppResult<()> {
        check_id(id, "Role")?;
        self.repo.delete(id).await?;
        info!(role_id = id, "Role deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::AppError;
    use mockall::predicate::eq;
    use tokio_test::{assert_err, assert_ok};

    use crate::repository::MockRoleRepository;

    #[tokio::test]
    async fn test_create_role_success() {
        let mut repo = MockRoleRepository::new();
        repo.expect_find_by_name()
            .with(eq("ROLE_COACH"))
            .returning(|_| Ok(None));
        repo.expect_create()
            .with(eq("ROLE_COACH".to_string()))
            .returning(|name| Ok(Role { id: 3, name }));

        let service = RoleManager::new(Arc::new(repo));
        let role = assert_ok!(service.create_role("ROLE_COACH".to_string()).await);

        assert_eq!(role.id, 3);
    }

    #[tokio::test]
    async fn test_create_role_duplicate() {
        let mut repo = MockRoleRepository::new();
        repo.expect_find_by_name().returning(|name| {
            Ok(Some(Role {
                id: 1,
                name: name.to_string(),
            }))
        });
        repo.expect_create().never();

        let service = RoleManager::new(Arc::new(repo));
        let err = assert_err!(service.create_role("ROLE_USER".to_string()).await);

        assert!(matches!(err, AppError::DuplicateName(ref m) if m == "Role 'ROLE_USER' already exists"));
    }

    #[tokio::test]
    async fn test_create_role_blank_name() {
        let service = RoleManager::new(Arc::new(MockRoleRepository::new()));
        let err = assert_err!(service.create_role(String::new()).await);
        assert!(matches!(err, AppError::Validation(ref m) if m == "Role name is required"));
    }

    #[tokio::test]
    async fn test_delete_missing_role() {
        let mut repo = MockRoleRepository::new();
        repo.expect_delete()
            .with(eq(8))
            .returning(|id| Err(AppError::not_found("Role", id)));

        let service = RoleManager::new(Arc::new(repo));
        let err = assert_err!(service.delete_role(8).await);

        assert!(matches!(err, AppError::NotFound(ref m) if m == "Role not found with ID: 8"));
    }
}
