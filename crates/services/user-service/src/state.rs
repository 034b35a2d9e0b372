//! Application state for dependency injection.

use std::sync::Arc;

use crate::infra::Database;
use crate::service::{RoleService, UserService};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserService>,
    pub role_service: Arc<dyn RoleService>,
    pub db: Database,
}

impl AppState {
    pub fn new(
        user_service: Arc<dyn UserService>,
        role_service: Arc<dyn RoleService>,
        db: Database,
    ) -> Self {
        Self {
            user_service,
            role_service,
            db,
        }
    }
}
