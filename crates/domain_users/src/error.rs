//! User directory errors

use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur in the user directory
#[derive(Debug, Error)]
pub enum UserError {
    /// No user matches the id or username
    #[error("User not found: {0}")]
    NotFound(String),

    /// The username is already taken
    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    /// Provisioning input failed validation
    #[error("Invalid user data: {0}")]
    Validation(String),

    /// The backing store failed
    #[error(transparent)]
    Port(#[from] PortError),
}

impl From<validator::ValidationErrors> for UserError {
    fn from(errors: validator::ValidationErrors) -> Self {
        UserError::Validation(errors.to_string())
    }
}
