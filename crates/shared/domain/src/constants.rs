//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Roles
// =============================================================================

/// Default role assigned to new users
pub const ROLE_USER: &str = "ROLE_USER";

/// Administrator role with elevated privileges
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

/// Roles seeded by the user-service migrations
pub const SEEDED_ROLES: &[&str] = &[ROLE_USER, ROLE_ADMIN];

// =============================================================================
// Accounts
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum username length
pub const MAX_USERNAME_LENGTH: usize = 50;

/// Maximum email length
pub const MAX_EMAIL_LENGTH: usize = 100;

/// Maximum role name length
pub const MAX_ROLE_NAME_LENGTH: usize = 50;

// =============================================================================
// Exercise catalog
// =============================================================================

pub const MIN_EXERCISE_NAME_LENGTH: usize = 2;
pub const MAX_EXERCISE_NAME_LENGTH: usize = 100;
pub const MAX_EXERCISE_TYPE_LENGTH: usize = 50;
pub const MAX_MUSCLE_LENGTH: usize = 50;
pub const MAX_EQUIPMENT_LENGTH: usize = 50;
pub const MAX_DIFFICULTY_LENGTH: usize = 20;
pub const MAX_INSTRUCTIONS_LENGTH: usize = 2000;

// =============================================================================
// Workout routines
// =============================================================================

/// Maximum routine name length
pub const MAX_ROUTINE_NAME_LENGTH: usize = 100;

/// Maximum routine description length
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;

/// Maximum free-form duration length (e.g. "45 minutes")
pub const MAX_DURATION_LENGTH: usize = 50;
