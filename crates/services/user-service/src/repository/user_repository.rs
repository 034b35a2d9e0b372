//! User account repository.
//!
//! Users are always loaded together with their role names. Creating a user
//! and granting the default role happen in one transaction.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Select, Set, SqlErr, TransactionTrait,
};

use super::entities::role::{self, Entity as RoleEntity};
use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use super::entities::user_role;
use common::{AppError, AppResult};
use domain::{NewUser, User};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

pub(crate) fn duplicate_username(username: &str) -> AppError {
    AppError::DuplicateUsername(format!("Username already exists: {}", username))
}

pub(crate) fn duplicate_email(email: &str) -> AppError {
    AppError::DuplicateEmail(format!("Email already exists: {}", email))
}

/// Pick the duplicate error from the index the database reported.
fn unique_violation(err: DbErr, username: &str, email: &str) -> AppError {
    let on_email = matches!(
        err.sql_err(),
        Some(SqlErr::UniqueConstraintViolation(ref detail)) if detail.contains("email")
    );
    AppError::from_db_unique(err, || {
        if on_email {
            duplicate_email(email)
        } else {
            duplicate_username(username)
        }
    })
}

fn to_user(model: user::Model, roles: Vec<role::Model>) -> User {
    let profile = model.profile();
    User {
        id: model.id,
        username: model.username,
        email: model.email,
        password_hash: model.password_hash,
        profile,
        roles: roles.into_iter().map(|r| r.name).collect(),
        enabled: model.enabled,
        locked: model.locked,
        failed_login_attempts: model.failed_login_attempts,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn list(&self) -> AppResult<Vec<User>>;

    /// Whether another account (not `exclude_id`) uses `username`
    async fn username_taken(&self, username: &str, exclude_id: Option<i64>) -> AppResult<bool>;

    /// Whether another account (not `exclude_id`) uses `email`
    async fn email_taken(&self, email: &str, exclude_id: Option<i64>) -> AppResult<bool>;

    /// Insert the account and grant `default_role`, creating the role if it
    /// does not exist yet
    async fn create(&self, user: NewUser, default_role: String) -> AppResult<User>;

    /// Persist username, email, profile and account flags
    async fn update(&self, user: &User) -> AppResult<User>;

    /// Delete the account and its role memberships
    async fn delete(&self, id: i64) -> AppResult<()>;
}

/// SeaORM-backed user repository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load_one(&self, query: Select<UserEntity>) -> AppResult<Option<User>> {
        let mut rows = query.find_with_related(RoleEntity).all(&self.db).await?;
        Ok(rows.pop().map(|(model, roles)| to_user(model, roles)))
    }

    async fn taken(
        &self,
        column: user::Column,
        value: &str,
        exclude_id: Option<i64>,
    ) -> AppResult<bool> {
        let mut query = UserEntity::find().filter(column.eq(value));
        if let Some(id) = exclude_id {
            query = query.filter(user::Column::Id.ne(id));
        }
        Ok(query.count(&self.db).await? > 0)
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        self.load_one(UserEntity::find_by_id(id)).await
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        self.load_one(UserEntity::find().filter(user::Column::Username.eq(username)))
            .await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.load_one(UserEntity::find().filter(user::Column::Email.eq(email)))
            .await
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let rows = UserEntity::find()
            .order_by_asc(user::Column::Id)
            .find_with_related(RoleEntity)
            .all(&self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(model, roles)| to_user(model, roles))
            .collect())
    }

    async fn username_taken(&self, username: &str, exclude_id: Option<i64>) -> AppResult<bool> {
        self.taken(user::Column::Username, username, exclude_id).await
    }

    async fn email_taken(&self, email: &str, exclude_id: Option<i64>) -> AppResult<bool> {
        self.taken(user::Column::Email, email, exclude_id).await
    }

    async fn create(&self, new_user: NewUser, default_role: String) -> AppResult<User> {
        let txn = self.db.begin().await?;

        let existing = RoleEntity::find()
            .filter(role::Column::Name.eq(default_role.as_str()))
            .one(&txn)
            .await?;
        let role = match existing {
            Some(role) => role,
            None => {
                tracing::info!(role = %default_role, "Creating missing default role");
                role::ActiveModel {
                    name: Set(default_role),
                    ..Default::default()
                }
                .insert(&txn)
                .await?
            }
        };

        let now = Utc::now();
        let username = new_user.username.clone();
        let email = new_user.email.clone();
        let mut active = ActiveModel {
            username: Set(new_user.username),
            email: Set(new_user.email),
            password_hash: Set(new_user.password.into_string()),
            enabled: Set(true),
            locked: Set(false),
            failed_login_attempts: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        active.set_profile(new_user.profile);

        let model = active
            .insert(&txn)
            .await
            .map_err(|e| unique_violation(e, &username, &email))?;

        user_role::Entity::insert(user_role::ActiveModel {
            user_id: Set(model.id),
            role_id: Set(role.id),
        })
        .exec_without_returning(&txn)
        .await?;

        txn.commit().await?;
        Ok(to_user(model, vec![role]))
    }

    async fn update(&self, user: &User) -> AppResult<User> {
        let model = UserEntity::find_by_id(user.id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("User", user.id))?;

        let mut active: ActiveModel = model.into();
        active.username = Set(user.username.clone());
        active.email = Set(user.email.clone());
        active.set_profile(user.profile.clone());
        active.enabled = Set(user.enabled);
        active.locked = Set(user.locked);
        active.failed_login_attempts = Set(user.failed_login_attempts);
        active.updated_at = Set(user.updated_at);

        let model = active
            .update(&self.db)
            .await
            .map_err(|e| unique_violation(e, &user.username, &user.email))?;

        // Memberships are untouched by an update
        let mut updated = to_user(model, Vec::new());
        updated.roles = user.roles.clone();
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let txn = self.db.begin().await?;

        user_role::Entity::delete_many()
            .filter(user_role::Column::UserId.eq(id))
            .exec(&txn)
            .await?;
        let result = UserEntity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(AppError::not_found("User", id));
        }

        txn.commit().await?;
        Ok(())
    }
}
