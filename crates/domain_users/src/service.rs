//! User directory service
//!
//! Wraps a `UserDirectory` port with the provisioning rules: input
//! validation and username uniqueness.

use std::sync::Arc;

use tracing::{info, instrument};
use validator::Validate;

use core_kernel::UserId;

use crate::error::UserError;
use crate::ports::UserDirectory;
use crate::user::{NewUser, User, UserRole};

/// Application service for the user directory
#[derive(Clone)]
pub struct UserService {
    directory: Arc<dyn UserDirectory>,
}

impl UserService {
    /// Creates a service over the given directory port
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }

    /// Returns the underlying directory port
    pub fn directory(&self) -> &Arc<dyn UserDirectory> {
        &self.directory
    }

    /// Provisions a new user
    ///
    /// # Errors
    ///
    /// * `UserError::Validation` if the input is malformed
    /// * `UserError::DuplicateUsername` if the username is taken, including
    ///   when a concurrent insert wins the unique constraint
    #[instrument(skip(self, new_user), fields(username = %new_user.username, role = %new_user.role))]
    pub async fn create(&self, new_user: NewUser) -> Result<User, UserError> {
        new_user.validate()?;

        if self.directory.exists_by_username(&new_user.username).await? {
            return Err(UserError::DuplicateUsername(new_user.username));
        }

        let username = new_user.username.clone();
        let user = self.directory.insert(new_user).await.map_err(|e| {
            if e.is_conflict() {
                UserError::DuplicateUsername(username)
            } else {
                UserError::Port(e)
            }
        })?;

        info!(user_id = %user.id, "User provisioned");
        Ok(user)
    }

    /// Retrieves a user by ID
    pub async fn get_by_id(&self, id: UserId) -> Result<User, UserError> {
        self.directory
            .find_by_id(id)
            .await?
            .ok_or_else(|| UserError::NotFound(format!("id {}", id)))
    }

    /// Retrieves a user by username
    pub async fn get_by_username(&self, username: &str) -> Result<User, UserError> {
        self.directory
            .find_by_username(username)
            .await?
            .ok_or_else(|| UserError::NotFound(format!("username {}", username)))
    }

    /// Lists every user
    pub async fn list_all(&self) -> Result<Vec<User>, UserError> {
        Ok(self.directory.list_all().await?)
    }

    /// Lists users with the given role
    pub async fn list_by_role(&self, role: UserRole) -> Result<Vec<User>, UserError> {
        Ok(self.directory.list_by_role(role).await?)
    }
}
