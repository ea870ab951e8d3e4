//! User entity and provisioning input
//!
//! Users are created once and never updated. Two roles exist: regular users
//! submit claims, admins review them.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use core_kernel::UserId;

/// Role of a user in the claims process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Submits claims
    #[serde(alias = "USER", alias = "user", alias = "REGULAR")]
    Regular,
    /// Reviews claims
    #[serde(alias = "ADMIN")]
    Admin,
}

impl UserRole {
    /// Returns the wire name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Regular => "regular",
            UserRole::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "regular" | "user" => Ok(UserRole::Regular),
            "admin" => Ok(UserRole::Admin),
            other => Err(format!("unknown user role '{}'", other)),
        }
    }
}

/// A provisioned user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: UserId,
    /// Login name, unique across the directory
    pub username: String,
    /// Contact email
    pub email: String,
    /// Full name, shown on claim views
    pub full_name: String,
    /// Role
    pub role: UserRole,
    /// Provisioning timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Returns true if the user may review claims
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Name shown to other users
    pub fn display_name(&self) -> &str {
        &self.full_name
    }
}

/// Input for provisioning a user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_new_user"))]
pub struct NewUser {
    #[validate(length(min = 1, max = 50, message = "username must be between 1 and 50 characters"))]
    pub username: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, max = 100, message = "full name must be between 1 and 100 characters"))]
    pub full_name: String,
    pub role: UserRole,
}

impl NewUser {
    /// Creates provisioning input
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        full_name: impl Into<String>,
        role: UserRole,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            full_name: full_name.into(),
            role,
        }
    }

    /// Materializes the user with a fresh identifier and timestamp
    pub fn into_user(self) -> User {
        User {
            id: UserId::new_v7(),
            username: self.username,
            email: self.email,
            full_name: self.full_name,
            role: self.role,
            created_at: Utc::now(),
        }
    }
}

fn validate_new_user(user: &NewUser) -> Result<(), ValidationError> {
    if user.username.chars().any(char::is_whitespace) {
        let mut error = ValidationError::new("username_whitespace");
        error.message = Some(Cow::from("username must not contain whitespace"));
        return Err(error);
    }
    if user.full_name.trim().is_empty() {
        let mut error = ValidationError::new("blank_full_name");
        error.message = Some(Cow::from("full name must not be blank"));
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_role_parses_legacy_names() {
        assert_eq!("USER".parse::<UserRole>().unwrap(), UserRole::Regular);
        assert_eq!("Admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert!("auditor".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_valid_new_user() {
        let user = NewUser::new("alice", "alice@example.com", "Alice Liddell", UserRole::Regular);
        assert!(user.validate().is_ok());
    }

    #[test]
    fn test_username_with_space_rejected() {
        let user = NewUser::new("alice l", "alice@example.com", "Alice", UserRole::Regular);
        assert!(user.validate().is_err());
    }

    #[test]
    fn test_blank_full_name_rejected() {
        let user = NewUser::new("alice", "alice@example.com", "   ", UserRole::Regular);
        assert!(user.validate().is_err());
    }

    #[test]
    fn test_bad_email_rejected() {
        let user = NewUser::new("alice", "not-an-email", "Alice", UserRole::Regular);
        assert!(user.validate().is_err());
    }

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
        let legacy: UserRole = serde_json::from_str("\"USER\"").unwrap();
        assert_eq!(legacy, UserRole::Regular);
    }

    proptest! {
        #[test]
        fn prop_usernames_without_whitespace_are_accepted(username in "[a-z][a-z0-9_]{0,49}") {
            let user = NewUser::new(username, "someone@example.com", "Some One", UserRole::Regular);
            prop_assert!(user.validate().is_ok());
        }

        #[test]
        fn prop_role_display_parses_back(admin in any::<bool>()) {
            let role = if admin { UserRole::Admin } else { UserRole::Regular };
            prop_assert_eq!(role.to_string().parse::<UserRole>().unwrap(), role);
        }
    }
}
