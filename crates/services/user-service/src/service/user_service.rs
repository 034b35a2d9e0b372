//! User account service.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use common::{AppError, AppResult, OptionExt};
use domain::error::{check_id, require_text};
use domain::{
    validate_account, Credentials, NewUser, Password, User, UserChanges, UserProfile, ROLE_USER,
};

use crate::repository::{duplicate_email, duplicate_username, UserRepository};

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Register an account with the default role
    async fn create_user(
        &self,
        username: String,
        email: String,
        password: String,
        profile: UserProfile,
    ) -> AppResult<User>;

    async fn get_user(&self, id: i64) -> AppResult<User>;

    async fn get_user_by_username(&self, username: &str) -> AppResult<User>;

    async fn get_user_by_email(&self, email: &str) -> AppResult<User>;

    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Partial update; username and email stay unique
    async fn update_user(&self, id: i64, changes: UserChanges) -> AppResult<User>;

    /// Partial update of profile fields only
    async fn update_profile(&self, id: i64, profile: UserProfile) -> AppResult<User>;

    async fn delete_user(&self, id: i64) -> AppResult<()>;

    /// Authentication view of the account called `username`
    async fn load_credentials(&self, username: &str) -> AppResult<Credentials>;
}

/// Concrete implementation of UserService using repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
}

impl UserManager {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    async fn check_unique(
        &self,
        username: &str,
        email: &str,
        exclude_id: Option<i64>,
    ) -> AppResult<()> {
        if self.repo.username_taken(username, exclude_id).await? {
            warn!(username, "Rejected duplicate username");
            return Err(duplicate_username(username));
        }
        if self.repo.email_taken(email, exclude_id).await? {
            warn!(email, "Rejected duplicate email");
            return Err(duplicate_email(email));
        }
        Ok(())
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn create_user(
        &self,
        username: String,
        email: String,
        password: String,
        profile: UserProfile,
    ) -> AppResult<User> {
        validate_account(&username, &email, &profile)?;
        Password::check_length(&password)?;

        self.check_unique(&username, &email, None).await?;

        let new_user = NewUser {
            username,
            email,
            password: Password::new(&password)?,
            profile,
        };
        let created = self.repo.create(new_user, ROLE_USER.to_string()).await?;
        info!(user_id = created.id, username = %created.username, "User created");
        Ok(created)
    }

    async fn get_user(&self, id: i64) -> AppResult<User> {
        check_id(id, "User")?;
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User", id))
    }

    async fn get_user_by_username(&self, username: &str) -> AppResult<User> {
        require_text(username, "Username")?;
        self.repo
            .find_by_username(username)
            .await?
            .ok_or_not_found(format!("User not found with username: {}", username))
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<User> {
        require_text(email, "Email")?;
        self.repo
            .find_by_email(email)
            .await?
            .ok_or_not_found(format!("User not found with email: {}", email))
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repo.list().await
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> AppResult<User> {
        check_id(id, "User")?;
        changes.validate()?;

        let mut user = self.get_user(id).await?;

        if let Some(username) = changes.username.as_deref().filter(|u| *u != user.username) {
            if self.repo.username_taken(username, Some(id)).await? {
                warn!(user_id = id, username, "Rejected rename to an existing username");
                return Err(duplicate_username(username));
            }
        }
        if let Some(email) = changes.email.as_deref().filter(|e| *e != user.email) {
            if self.repo.email_taken(email, Some(id)).await? {
                warn!(user_id = id, email, "Rejected change to an existing email");
                return Err(duplicate_email(email));
            }
        }

        user.apply(changes);
        let updated = self.repo.update(&user).await?;
        info!(user_id = id, "User updated");
        Ok(updated)
    }

    async fn update_profile(&self, id: i64, profile: UserProfile) -> AppResult<User> {
        check_id(id, "User")?;
        profile.validate()?;

        let mut user = self.get_user(id).await?;
        user.profile.merge(profile);
        user.updated_at = Utc::now();

        let updated = self.repo.update(&user).await?;
        info!(user_id = id, "User profile updated");
        Ok(updated)
    }

    async fn delete_user(&self, id: i64) -> AppResult<()> {
        check_id(id, "User")?;
        self.repo.delete(id).await?;
        info!(user_id = id, "User deleted");
        Ok(())
    }

    async fn load_credentials(&self, username: &str) -> AppResult<Credentials> {
        let user = self.get_user_by_username(username).await?;
        Ok(user.credentials())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    use mockall::predicate::eq;
    use tokio_test::{assert_err, assert_ok};

    use crate::repository::MockUserRepository;

    fn create_test_user(id: i64, username: &str, email: &str) -> User {
        let now = Utc::now();
        User {
            id,
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            profile: UserProfile::default(),
            roles: BTreeSet::from([ROLE_USER.to_string()]),
            enabled: true,
            locked: false,
            failed_login_attempts: 0,
            created_at: now,
            updated_at: now,
        }
    }

    async fn register(service: &UserManager, password: &str) -> AppResult<User> {
        service
            .create_user(
                "alice".to_string(),
                "alice@example.com".to_string(),
                password.to_string(),
                UserProfile::default(),
            )
            .await
    }

    // =========================================================================
    // create_user
    // =========================================================================

    #[tokio::test]
    async fn test_create_user_grants_default_role() {
        let mut repo = MockUserRepository::new();
        repo.expect_username_taken()
            .with(eq("alice"), eq(None::<i64>))
            .returning(|_, _| Ok(false));
        repo.expect_email_taken()
            .with(eq("alice@example.com"), eq(None::<i64>))
            .returning(|_, _| Ok(false));
        repo.expect_create()
            .withf(|user, role| {
                user.username == "alice" && user.password.verify("Password123") && role == ROLE_USER
            })
            .times(1)
            .returning(|user, _| Ok(create_test_user(1, &user.username, &user.email)));

        let service = UserManager::new(Arc::new(repo));
        let created = assert_ok!(register(&service, "Password123").await);

        assert_eq!(created.id, 1);
        assert!(created.has_role(ROLE_USER));
        assert!(created.enabled);
    }

    #[tokio::test]
    async fn test_create_user_short_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_create().never();

        let service = UserManager::new(Arc::new(repo));
        let err = assert_err!(register(&service, "short").await);

        assert!(matches!(err, AppError::Validation(ref m) if m.contains("at least 8")));
    }

    #[tokio::test]
    async fn test_create_user_blank_username() {
        let service = UserManager::new(Arc::new(MockUserRepository::new()));

        let err = assert_err!(
            service
                .create_user(
                    "  ".to_string(),
                    "alice@example.com".to_string(),
                    "Password123".to_string(),
                    UserProfile::default(),
                )
                .await
        );

        assert!(matches!(err, AppError::Validation(ref m) if m == "Username is required"));
    }

    #[tokio::test]
    async fn test_create_user_duplicate_username() {
        let mut repo = MockUserRepository::new();
        repo.expect_username_taken().returning(|_, _| Ok(true));
        repo.expect_email_taken().never();
        repo.expect_create().never();

        let service = UserManager::new(Arc::new(repo));
        let err = assert_err!(register(&service, "Password123").await);

        assert!(matches!(err, AppError::DuplicateUsername(_)));
    }

    #[tokio::test]
    async fn test_create_user_rules_run_before_lookups() {
        let mut repo = MockUserRepository::new();
        repo.expect_username_taken().never();
        repo.expect_email_taken().never();
        repo.expect_create().never();

        let service = UserManager::new(Arc::new(repo));

        let err = assert_err!(register(&service, "short").await);
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("at least 8")));

        let err = assert_err!(
            service
                .create_user(
                    "alice".to_string(),
                    "not-an-address".to_string(),
                    "Password123".to_string(),
                    UserProfile::default(),
                )
                .await
        );
        assert!(matches!(err, AppError::Validation(ref m) if m == "Email must be a valid address"));
    }

    #[tokio::test]
    async fn test_create_user_duplicate_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_username_taken().returning(|_, _| Ok(false));
        repo.expect_email_taken().returning(|_, _| Ok(true));
        repo.expect_create().never();

        let service = UserManager::new(Arc::new(repo));
        let err = assert_err!(register(&service, "Password123").await);

        assert!(matches!(err, AppError::DuplicateEmail(ref m) if m == "Email already exists: alice@example.com"));
    }

    // =========================================================================
    // lookups
    // =========================================================================

    #[tokio::test]
    async fn test_get_user_by_username_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username()
            .with(eq("ghost"))
            .returning(|_| Ok(None));

        let service = UserManager::new(Arc::new(repo));
        let err = assert_err!(service.get_user_by_username("ghost").await);

        assert!(matches!(err, AppError::NotFound(ref m) if m == "User not found with username: ghost"));
    }

    #[tokio::test]
    async fn test_load_credentials_projects_roles() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username()
            .returning(|name| Ok(Some(create_test_user(5, name, "a@example.com"))));

        let service = UserManager::new(Arc::new(repo));
        let credentials = assert_ok!(service.load_credentials("alice").await);

        assert_eq!(credentials.username, "alice");
        assert_eq!(credentials.authorities, vec![ROLE_USER.to_string()]);
        assert!(credentials.account_non_locked);
    }

    // =========================================================================
    // updates
    // =========================================================================

    #[tokio::test]
    async fn test_update_user_email_taken_by_other() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .with(eq(1))
            .returning(|id| Ok(Some(create_test_user(id, "alice", "alice@example.com"))));
        repo.expect_email_taken()
            .with(eq("bob@example.com"), eq(Some(1)))
            .returning(|_, _| Ok(true));
        repo.expect_update().never();

        let service = UserManager::new(Arc::new(repo));
        let err = assert_err!(
            service
                .update_user(
                    1,
                    UserChanges {
                        email: Some("bob@example.com".to_string()),
                        ..Default::default()
                    },
                )
                .await
        );

        assert!(matches!(err, AppError::DuplicateEmail(_)));
    }

    #[tokio::test]
    async fn test_update_user_same_username_skips_check() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(create_test_user(id, "alice", "alice@example.com"))));
        repo.expect_username_taken().never();
        repo.expect_update().returning(|user| Ok(user.clone()));

        let service = UserManager::new(Arc::new(repo));
        let updated = assert_ok!(
            service
                .update_user(
                    1,
                    UserChanges {
                        username: Some("alice".to_string()),
                        profile: UserProfile {
                            height: Some(170),
                            ..Default::default()
                        },
                        ..Default::default()
                    },
                )
                .await
        );

        assert_eq!(updated.profile.height, Some(170));
    }

    #[tokio::test]
    async fn test_update_profile_merges_fields() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|id| {
            let mut user = create_test_user(id, "alice", "alice@example.com");
            user.profile.display_name = Some("Alice".to_string());
            Ok(Some(user))
        });
        repo.expect_update().returning(|user| Ok(user.clone()));

        let service = UserManager::new(Arc::new(repo));
        let updated = assert_ok!(
            service
                .update_profile(
                    1,
                    UserProfile {
                        fitness_goal: Some("strength".to_string()),
                        ..Default::default()
                    },
                )
                .await
        );

        assert_eq!(updated.profile.display_name.as_deref(), Some("Alice"));
        assert_eq!(updated.profile.fitness_goal.as_deref(), Some("strength"));
    }

    #[tokio::test]
    async fn test_update_profile_rejects_negative_weight() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().never();

        let service = UserManager::new(Arc::new(repo));
        let result = service
            .update_profile(
                1,
                UserProfile {
                    weight: Some(-3.0),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_delete()
            .with(eq(9))
            .returning(|id| Err(AppError::not_found("User", id)));

        let service = UserManager::new(Arc::new(repo));
        let err = assert_err!(service.delete_user(9).await);

        assert!(matches!(err, AppError::NotFound(_)));
    }
}
