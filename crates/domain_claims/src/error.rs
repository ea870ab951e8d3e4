//! Claims domain errors

use thiserror::Error;

use core_kernel::PortError;
use crate::claim::ClaimStatus;

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Claim not found: {0}")]
    ClaimNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Invalid claim data: {0}")]
    Validation(String),

    #[error("User {0} is not an admin and cannot review claims")]
    ReviewerNotAdmin(String),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: ClaimStatus, to: ClaimStatus },

    #[error(transparent)]
    Port(#[from] PortError),
}
