//! In-memory user and role repositories for the integration tests.
//!
//! Memberships live in their own set so deleting a role or a user revokes
//! them the way the `user_roles` foreign keys do.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use common::{AppError, AppResult};
use domain::{NewUser, Role, User, UserProfile, SEEDED_ROLES};
use user_service_lib::infra::Database;
use user_service_lib::repository::{RoleRepository, UserRepository};
use user_service_lib::service::{RoleManager, RoleService, UserManager, UserService};
use user_service_lib::state::AppState;

#[derive(Default)]
struct Tables {
    last_id: i64,
    /// Users are stored with an empty role set
    users: BTreeMap<i64, User>,
    roles: BTreeMap<i64, Role>,
    /// (user id, role id)
    memberships: BTreeSet<(i64, i64)>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn with_roles(&self, user: &User) -> User {
        let mut user = user.clone();
        user.roles = self
            .memberships
            .iter()
            .filter(|(user_id, _)| *user_id == user.id)
            .filter_map(|(_, role_id)| self.roles.get(role_id))
            .map(|role| role.name.clone())
            .collect();
        user
    }

    fn find_user(&self, keep: impl Fn(&User) -> bool) -> Option<User> {
        self.users.values().find(|u| keep(u)).map(|u| self.with_roles(u))
    }

    fn role_id(&mut self, name: &str) -> i64 {
        if let Some(role) = self.roles.values().find(|r| r.name == name) {
            return role.id;
        }
        let id = self.next_id();
        self.roles.insert(
            id,
            Role {
                id,
                name: name.to_string(),
            },
        );
        id
    }
}

/// Fake persistence backing both repository traits.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the roles the migrations seed.
    pub fn seeded() -> Self {
        let store = Self::new();
        {
            let mut tables = store.tables();
            for name in SEEDED_ROLES {
                tables.role_id(name);
            }
        }
        store
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    pub fn membership_count(&self) -> usize {
        self.tables().memberships.len()
    }

    pub fn role_names(&self) -> Vec<String> {
        self.tables().roles.values().map(|r| r.name.clone()).collect()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        Ok(self.tables().find_user(|u| u.id == id))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self.tables().find_user(|u| u.username == username))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.tables().find_user(|u| u.email == email))
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let tables = self.tables();
        Ok(tables.users.values().map(|u| tables.with_roles(u)).collect())
    }

    async fn username_taken(&self, username: &str, exclude_id: Option<i64>) -> AppResult<bool> {
        Ok(self
            .tables()
            .users
            .values()
            .any(|u| u.username == username && Some(u.id) != exclude_id))
    }

    async fn email_taken(&self, email: &str, exclude_id: Option<i64>) -> AppResult<bool> {
        Ok(self
            .tables()
            .users
            .values()
            .any(|u| u.email == email && Some(u.id) != exclude_id))
    }

    async fn create(&self, user: NewUser, default_role: String) -> AppResult<User> {
        let mut tables = self.tables();
        let role_id = tables.role_id(&default_role);
        let id = tables.next_id();
        let now = Utc::now();

        let stored = User {
            id,
            username: user.username,
            email: user.email,
            password_hash: user.password.into_string(),
            profile: user.profile,
            roles: BTreeSet::new(),
            enabled: true,
            locked: false,
            failed_login_attempts: 0,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(id, stored.clone());
        tables.memberships.insert((id, role_id));
        Ok(tables.with_roles(&stored))
    }

    async fn update(&self, user: &User) -> AppResult<User> {
        let mut tables = self.tables();
        let stored = tables
            .users
            .get_mut(&user.id)
            .ok_or_else(|| AppError::not_found("User", user.id))?;
        *stored = User {
            roles: BTreeSet::new(),
            ..user.clone()
        };
        let stored = stored.clone();
        Ok(tables.with_roles(&stored))
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let mut tables = self.tables();
        if tables.users.remove(&id).is_none() {
            return Err(AppError::not_found("User", id));
        }
        tables.memberships.retain(|(user_id, _)| *user_id != id);
        Ok(())
    }
}

#[async_trait]
impl RoleRepository for InMemoryStore {
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        Ok(self
            .tables()
            .roles
            .values()
            .find(|r| r.name == name)
            .cloned())
    }

    async fn list(&self) -> AppResult<Vec<Role>> {
        Ok(self.tables().roles.values().cloned().collect())
    }

    async fn create(&self, name: String) -> AppResult<Role> {
        let mut tables = self.tables();
        let id = tables.role_id(&name);
        Ok(Role { id, name })
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let mut tables = self.tables();
        if tables.roles.remove(&id).is_none() {
            return Err(AppError::not_found("Role", id));
        }
        tables.memberships.retain(|(_, role_id)| *role_id != id);
        Ok(())
    }
}

/// Managers wired over one shared in-memory store.
pub struct Services {
    pub store: InMemoryStore,
    pub users: Arc<dyn UserService>,
    pub roles: Arc<dyn RoleService>,
}

impl Services {
    pub fn new() -> Self {
        Self::over(InMemoryStore::seeded())
    }

    pub fn over(store: InMemoryStore) -> Self {
        let shared = Arc::new(store.clone());
        Self {
            users: Arc::new(UserManager::new(shared.clone())),
            roles: Arc::new(RoleManager::new(shared)),
            store,
        }
    }

    /// Router state with a database that is never connected.
    pub fn app_state(&self) -> AppState {
        AppState::new(
            self.users.clone(),
            self.roles.clone(),
            Database::from(sea_orm::DatabaseConnection::Disconnected),
        )
    }
}

pub async fn register(services: &Services, username: &str) -> User {
    services
        .users
        .create_user(
            username.to_string(),
            format!("{}@example.com", username),
            "Password123".to_string(),
            UserProfile {
                display_name: Some(username.to_uppercase()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
}
