//! Sample-data bootstrap
//!
//! Provisions two claimants and one admin for local development. Safe to run
//! on every start: users that already exist are left alone.

use tracing::{debug, info};

use crate::error::UserError;
use crate::service::UserService;
use crate::user::{NewUser, User, UserRole};

/// The users provisioned by [`seed_sample_users`]
pub fn sample_users() -> Vec<NewUser> {
    vec![
        NewUser::new("john_doe", "john@example.com", "John Doe", UserRole::Regular),
        NewUser::new("jane_smith", "jane@example.com", "Jane Smith", UserRole::Regular),
        NewUser::new("admin", "admin@example.com", "Admin User", UserRole::Admin),
    ]
}

/// Provisions the sample users that do not exist yet
///
/// # Returns
///
/// The users created by this call; empty when everything was already seeded
pub async fn seed_sample_users(service: &UserService) -> Result<Vec<User>, UserError> {
    let mut created = Vec::new();

    for new_user in sample_users() {
        match service.create(new_user).await {
            Ok(user) => created.push(user),
            Err(UserError::DuplicateUsername(username)) => {
                debug!(%username, "Sample user already present");
            }
            Err(e) => return Err(e),
        }
    }

    info!(created = created.len(), "Sample users seeded");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::ports::mock::MockUserDirectory;

    #[tokio::test]
    async fn test_seeding_twice_creates_users_once() {
        let directory = MockUserDirectory::new();
        let service = UserService::new(Arc::new(directory.clone()));

        let first = seed_sample_users(&service).await.unwrap();
        assert_eq!(first.len(), 3);

        let second = seed_sample_users(&service).await.unwrap();
        assert!(second.is_empty());
        assert_eq!(directory.len().await, 3);

        let admins = service.list_by_role(UserRole::Admin).await.unwrap();
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0].username, "admin");
    }

    #[test]
    fn test_sample_users_are_valid() {
        use validator::Validate;
        for user in sample_users() {
            assert!(user.validate().is_ok(), "{} should be valid", user.username);
        }
    }
}
