//! User domain entity and related types.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_EMAIL_LENGTH, MAX_USERNAME_LENGTH};
use crate::error::{check_max_len, require_text, DomainError, DomainResult};
use crate::password::Password;

/// Optional profile attributes. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub display_name: Option<String>,
    pub phone: Option<String>,
    /// Body weight in kilograms
    pub weight: Option<f64>,
    /// Height in centimetres
    pub height: Option<i32>,
    pub photo_url: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub fitness_goal: Option<String>,
    pub experience_level: Option<String>,
    pub weekly_workouts: Option<i32>,
    /// Preferred workout duration in minutes
    pub workout_duration: Option<i32>,
    pub preferred_workout_times: Option<String>,
}

impl UserProfile {
    /// Copy every present field of `changes` over `self`.
    pub fn merge(&mut self, changes: UserProfile) {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if changes.$field.is_some() { self.$field = changes.$field; })*
            };
        }
        take!(
            display_name,
            phone,
            weight,
            height,
            photo_url,
            date_of_birth,
            gender,
            fitness_goal,
            experience_level,
            weekly_workouts,
            workout_duration,
            preferred_workout_times
        );
    }

    pub fn validate(&self) -> DomainResult<()> {
        if matches!(self.weight, Some(w) if w <= 0.0) {
            return Err(DomainError::validation("Weight must be positive"));
        }
        if matches!(self.height, Some(h) if h <= 0) {
            return Err(DomainError::validation("Height must be positive"));
        }
        if matches!(self.weekly_workouts, Some(n) if n < 0) {
            return Err(DomainError::validation("Weekly workouts cannot be negative"));
        }
        if matches!(self.workout_duration, Some(m) if m <= 0) {
            return Err(DomainError::validation("Workout duration must be positive"));
        }
        Ok(())
    }
}

/// User domain entity
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub profile: UserProfile,
    /// Role names, e.g. `ROLE_USER`
    pub roles: BTreeSet<String>,
    pub enabled: bool,
    pub locked: bool,
    pub failed_login_attempts: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Project the account into what an authentication collaborator needs.
    pub fn credentials(&self) -> Credentials {
        Credentials {
            username: self.username.clone(),
            password: Password::from_hash(self.password_hash.clone()),
            authorities: self.roles.iter().cloned().collect(),
            enabled: self.enabled,
            account_non_locked: !self.locked,
        }
    }

    pub fn apply(&mut self, changes: UserChanges) {
        if let Some(username) = changes.username {
            self.username = username;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
        self.profile.merge(changes.profile);
        self.updated_at = Utc::now();
    }
}

/// Authentication view of a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: Password,
    /// Role names granted to the account
    pub authorities: Vec<String>,
    pub enabled: bool,
    pub account_non_locked: bool,
}

impl Credentials {
    /// True when the account may log in with `plain_text`.
    pub fn accepts(&self, plain_text: &str) -> bool {
        self.enabled && self.account_non_locked && self.password.verify(plain_text)
    }
}

fn check_username(username: &str) -> DomainResult<()> {
    require_text(username, "Username")?;
    check_max_len(username, MAX_USERNAME_LENGTH, "Username")
}

fn check_email(email: &str) -> DomainResult<()> {
    require_text(email, "Email")?;
    check_max_len(email, MAX_EMAIL_LENGTH, "Email")?;
    if !email.contains('@') {
        return Err(DomainError::validation("Email must be a valid address"));
    }
    Ok(())
}

/// Account fields checked before any uniqueness lookup or hashing.
pub fn validate_account(username: &str, email: &str, profile: &UserProfile) -> DomainResult<()> {
    check_username(username)?;
    check_email(email)?;
    profile.validate()
}

/// User creation input. The password is already hashed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: Password,
    pub profile: UserProfile,
}

impl NewUser {
    pub fn validate(&self) -> DomainResult<()> {
        validate_account(&self.username, &self.email, &self.profile)
    }
}

/// Partial user update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub profile: UserProfile,
}

impl UserChanges {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(username) = &self.username {
            check_username(username)?;
        }
        if let Some(email) = &self.email {
            check_email(email)?;
        }
        self.profile.validate()
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(flatten)]
    pub profile: UserProfile,
    pub roles: Vec<String>,
    pub enabled: bool,
    pub locked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            profile: user.profile,
            roles: user.roles.into_iter().collect(),
            enabled: user.enabled,
            locked: user.locked,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ROLE_USER;

    fn create_test_user() -> User {
        let now = Utc::now();
        User {
            id: 1,
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            password_hash: Password::new("Password123").unwrap().into_string(),
            profile: UserProfile {
                display_name: Some("Jane".to_string()),
                weight: Some(61.5),
                ..Default::default()
            },
            roles: BTreeSet::from([ROLE_USER.to_string()]),
            enabled: true,
            locked: false,
            failed_login_attempts: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_profile_merge_keeps_absent_fields() {
        let mut profile = create_test_user().profile;
        profile.merge(UserProfile {
            phone: Some("555-0100".to_string()),
            weight: Some(60.0),
            ..Default::default()
        });

        assert_eq!(profile.display_name.as_deref(), Some("Jane"));
        assert_eq!(profile.phone.as_deref(), Some("555-0100"));
        assert_eq!(profile.weight, Some(60.0));
    }

    #[test]
    fn test_profile_rejects_non_positive_measurements() {
        let profile = UserProfile {
            height: Some(0),
            ..Default::default()
        };
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_credentials_authorities_are_role_names() {
        let user = create_test_user();
        let credentials = user.credentials();

        assert_eq!(credentials.authorities, vec![ROLE_USER.to_string()]);
        assert!(credentials.accepts("Password123"));
        assert!(!credentials.accepts("nope-nope"));
    }

    #[test]
    fn test_locked_account_is_rejected() {
        let mut user = create_test_user();
        user.locked = true;
        assert!(!user.credentials().accepts("Password123"));
    }

    #[test]
    fn test_changes_validate_email() {
        let changes = UserChanges {
            email: Some("not-an-email".to_string()),
            ..Default::default()
        };
        assert!(changes.validate().is_err());
    }

    #[test]
    fn test_response_flattens_profile() {
        let json = serde_json::to_value(UserResponse::from(create_test_user())).unwrap();

        assert_eq!(json["displayName"], "Jane");
        assert_eq!(json["roles"][0], ROLE_USER);
        assert!(json.get("passwordHash").is_none());
    }
}
