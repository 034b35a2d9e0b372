//! Repository layer for data access.

pub mod entities;
mod role_repository;
mod user_repository;

pub use role_repository::{RoleRepository, RoleStore};
pub use user_repository::{UserRepository, UserStore};

pub(crate) use role_repository::duplicate_name as duplicate_role_name;
pub(crate) use user_repository::{duplicate_email, duplicate_username};

#[cfg(any(test, feature = "test-utils"))]
pub use role_repository::MockRoleRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
