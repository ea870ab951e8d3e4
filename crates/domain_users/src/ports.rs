//! User Directory Port
//!
//! The `UserDirectory` trait is the persistence seam of the user domain.
//! `infra_db` provides the PostgreSQL adapter; the in-memory mock below is
//! used by unit and HTTP tests.
//!
//! Lookups return `Ok(None)` or an empty vector when nothing matches.
//! Turning an absent user into an error is the caller's decision.

use async_trait::async_trait;

use core_kernel::{DomainPort, HealthCheckable, PortError, UserId};

use crate::user::{NewUser, User, UserRole};

/// Persistence operations over users
#[async_trait]
pub trait UserDirectory: DomainPort + HealthCheckable {
    /// Inserts a new user
    ///
    /// # Returns
    ///
    /// The stored user, or `PortError::Conflict` if the username is taken
    async fn insert(&self, user: NewUser) -> Result<User, PortError>;

    /// Retrieves a user by ID
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, PortError>;

    /// Retrieves all users whose id is in `ids`
    ///
    /// Unknown ids are skipped, so the result may be shorter than the input.
    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, PortError>;

    /// Retrieves a user by username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, PortError>;

    /// Checks whether a username is taken
    async fn exists_by_username(&self, username: &str) -> Result<bool, PortError>;

    /// Lists all users in provisioning order
    async fn list_all(&self) -> Result<Vec<User>, PortError>;

    /// Lists users with the given role in provisioning order
    async fn list_by_role(&self, role: UserRole) -> Result<Vec<User>, PortError>;
}

/// Mock implementation of UserDirectory for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::HealthCheckResult;

    /// In-memory mock implementation of UserDirectory
    #[derive(Debug, Default, Clone)]
    pub struct MockUserDirectory {
        users: Arc<RwLock<HashMap<UserId, User>>>,
    }

    impl MockUserDirectory {
        /// Creates an empty directory
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of stored users
        pub async fn len(&self) -> usize {
            self.users.read().await.len()
        }

        /// Returns true if no user is stored
        pub async fn is_empty(&self) -> bool {
            self.users.read().await.is_empty()
        }

        fn sorted(mut users: Vec<User>) -> Vec<User> {
            users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
            users
        }
    }

    impl DomainPort for MockUserDirectory {}

    #[async_trait]
    impl HealthCheckable for MockUserDirectory {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::healthy("mock-user-directory")
        }
    }

    #[async_trait]
    impl UserDirectory for MockUserDirectory {
        async fn insert(&self, user: NewUser) -> Result<User, PortError> {
            let mut users = self.users.write().await;
            if users.values().any(|u| u.username == user.username) {
                return Err(PortError::conflict(format!(
                    "username '{}' already exists",
                    user.username
                )));
            }
            let user = user.into_user();
            users.insert(user.id, user.clone());
            Ok(user)
        }

        async fn find_by_id(&self, id: UserId) -> Result<Option<User>, PortError> {
            Ok(self.users.read().await.get(&id).cloned())
        }

        async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, PortError> {
            let users = self.users.read().await;
            Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
        }

        async fn find_by_username(&self, username: &str) -> Result<Option<User>, PortError> {
            Ok(self
                .users
                .read()
                .await
                .values()
                .find(|u| u.username == username)
                .cloned())
        }

        async fn exists_by_username(&self, username: &str) -> Result<bool, PortError> {
            Ok(self.find_by_username(username).await?.is_some())
        }

        async fn list_all(&self) -> Result<Vec<User>, PortError> {
            let users = self.users.read().await.values().cloned().collect();
            Ok(Self::sorted(users))
        }

        async fn list_by_role(&self, role: UserRole) -> Result<Vec<User>, PortError> {
            let users = self
                .users
                .read()
                .await
                .values()
                .filter(|u| u.role == role)
                .cloned()
                .collect();
            Ok(Self::sorted(users))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockUserDirectory;
    use super::*;

    fn alice() -> NewUser {
        NewUser::new("alice", "alice@example.com", "Alice Liddell", UserRole::Regular)
    }

    #[tokio::test]
    async fn test_mock_insert_and_find() {
        let directory = MockUserDirectory::new();
        let user = directory.insert(alice()).await.unwrap();

        let by_id = directory.find_by_id(user.id).await.unwrap();
        assert_eq!(by_id.as_ref().map(|u| u.username.as_str()), Some("alice"));

        let by_name = directory.find_by_username("alice").await.unwrap();
        assert_eq!(by_name.map(|u| u.id), Some(user.id));
    }

    #[tokio::test]
    async fn test_mock_duplicate_username_is_conflict() {
        let directory = MockUserDirectory::new();
        directory.insert(alice()).await.unwrap();

        let result = directory.insert(alice()).await;
        assert!(result.unwrap_err().is_conflict());
        assert_eq!(directory.len().await, 1);
    }

    #[tokio::test]
    async fn test_mock_find_by_ids_skips_unknown() {
        let directory = MockUserDirectory::new();
        let user = directory.insert(alice()).await.unwrap();

        let found = directory.find_by_ids(&[user.id, UserId::new()]).await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        let directory = MockUserDirectory::new();
        assert!(directory.health_check().await.is_operational());
    }
}
