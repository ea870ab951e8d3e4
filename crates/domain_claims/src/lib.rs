//! Claims Domain
//!
//! This crate implements the claim lifecycle: a regular user submits a claim,
//! an admin reviews it, and both sides are told about it through
//! notification channels.
//!
//! # Claim Lifecycle
//!
//! ```text
//! pending -> in_progress -> approved/rejected
//! ```
//!
//! Which moves a review may make is decided by the configured
//! [`TransitionPolicy`].

pub mod claim;
pub mod transitions;
pub mod view;
pub mod ports;
pub mod notifications;
pub mod lifecycle;
pub mod error;

pub use claim::{Claim, ClaimStatus, ClaimSubmission, Review};
pub use transitions::TransitionPolicy;
pub use view::{ClaimView, DisplayNames};
pub use ports::ClaimStore;
pub use notifications::{
    Notification, NotificationChannel, NotificationDispatcher, NotificationPublisher,
};
pub use lifecycle::{ClaimLifecycle, ReviewDecision};
pub use error::ClaimError;

#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockClaimStore;
#[cfg(any(test, feature = "mock"))]
pub use notifications::mock::RecordingPublisher;
