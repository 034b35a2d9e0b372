//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::handlers::role_handler::RoleRequest;
use crate::handlers::user_handler::{CreateUserRequest, UpdateProfileRequest, UpdateUserRequest};
use domain::{RoleResponse, UserProfile, UserResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::user_handler::create_user,
        crate::handlers::user_handler::list_users,
        crate::handlers::user_handler::get_user,
        crate::handlers::user_handler::get_user_by_username,
        crate::handlers::user_handler::get_user_by_email,
        crate::handlers::user_handler::update_user,
        crate::handlers::user_handler::update_profile,
        crate::handlers::user_handler::delete_user,
        crate::handlers::role_handler::list_roles,
        crate::handlers::role_handler::create_role,
        crate::handlers::role_handler::delete_role,
    ),
    components(
        schemas(
            CreateUserRequest,
            UpdateUserRequest,
            UpdateProfileRequest,
            UserProfile,
            UserResponse,
            RoleRequest,
            RoleResponse,
        )
    ),
    tags(
        (name = "Users", description = "User accounts and fitness profiles"),
        (name = "Roles", description = "Role management"),
    )
)]
pub struct ApiDoc;
