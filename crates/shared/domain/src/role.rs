//! Role entity.

use serde::{Deserialize, Serialize};

use crate::constants::MAX_ROLE_NAME_LENGTH;
use crate::error::{check_max_len, require_text, DomainResult};

/// Named tag granted to users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: i64,
    pub name: String,
}

/// Check a role name before it is stored.
pub fn validate_role_name(name: &str) -> DomainResult<()> {
    require_text(name, "Role name")?;
    check_max_len(name, MAX_ROLE_NAME_LENGTH, "Role name")
}

/// Role response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RoleResponse {
    pub id: i64,
    pub name: String,
}

impl From<Role> for RoleResponse {
    fn from(role: Role) -> Self {
        Self {
            id: role.id,
            name: role.name,
        }
    }
}
