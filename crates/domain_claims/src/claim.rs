//! Claim aggregate

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use core_kernel::{ClaimId, UserId};
use crate::error::ClaimError;
use crate::transitions::TransitionPolicy;

/// Prefix of every generated claim number
pub const CLAIM_NUMBER_PREFIX: &str = "CLM-";

/// Length of the random part of a claim number
pub const CLAIM_NUMBER_SUFFIX_LEN: usize = 8;

/// Claim status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    /// Submitted, awaiting review
    #[serde(alias = "PENDING")]
    Pending,
    /// An admin is looking at it
    #[serde(alias = "IN_PROGRESS")]
    InProgress,
    /// Approved for payout
    #[serde(alias = "APPROVED")]
    Approved,
    /// Rejected
    #[serde(alias = "REJECTED")]
    Rejected,
}

impl ClaimStatus {
    /// All statuses in lifecycle order
    pub const ALL: [ClaimStatus; 4] = [
        ClaimStatus::Pending,
        ClaimStatus::InProgress,
        ClaimStatus::Approved,
        ClaimStatus::Rejected,
    ];

    /// Returns the wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Pending => "pending",
            ClaimStatus::InProgress => "in_progress",
            ClaimStatus::Approved => "approved",
            ClaimStatus::Rejected => "rejected",
        }
    }

    /// Upper-case label used in user-facing messages, e.g. `IN_PROGRESS`
    pub fn label(&self) -> &'static str {
        match self {
            ClaimStatus::Pending => "PENDING",
            ClaimStatus::InProgress => "IN_PROGRESS",
            ClaimStatus::Approved => "APPROVED",
            ClaimStatus::Rejected => "REJECTED",
        }
    }

    /// Returns true for final decisions
    pub fn is_terminal(&self) -> bool {
        matches!(self, ClaimStatus::Approved | ClaimStatus::Rejected)
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(ClaimStatus::Pending),
            "in_progress" => Ok(ClaimStatus::InProgress),
            "approved" => Ok(ClaimStatus::Approved),
            "rejected" => Ok(ClaimStatus::Rejected),
            other => Err(ClaimError::Validation(format!("unknown claim status '{}'", other))),
        }
    }
}

/// Review stamp
///
/// Reviewer and review time are set together or not at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Admin who made the decision
    pub reviewer_id: UserId,
    /// Free-text comments
    pub comments: Option<String>,
    /// When the decision was recorded
    pub reviewed_at: DateTime<Utc>,
}

/// Input for submitting a claim
#[derive(Debug, Clone)]
pub struct ClaimSubmission {
    pub description: String,
    pub claim_amount: Decimal,
    pub user_id: UserId,
}

impl ClaimSubmission {
    /// Creates a submission
    pub fn new(description: impl Into<String>, claim_amount: Decimal, user_id: UserId) -> Self {
        Self {
            description: description.into(),
            claim_amount,
            user_id,
        }
    }

    /// Checks the submission preconditions
    ///
    /// # Errors
    ///
    /// `ClaimError::Validation` for a blank description or a non-positive amount
    pub fn validate(&self) -> Result<(), ClaimError> {
        if self.description.trim().is_empty() {
            return Err(ClaimError::Validation("description must not be blank".to_string()));
        }
        if self.claim_amount <= Decimal::ZERO {
            return Err(ClaimError::Validation(format!(
                "claim amount must be positive, got {}",
                self.claim_amount
            )));
        }
        Ok(())
    }
}

/// An insurance claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Unique identifier
    pub id: ClaimId,
    /// Human-readable claim number (`CLM-XXXXXXXX`)
    pub claim_number: String,
    /// What happened
    pub description: String,
    /// Amount claimed, always positive
    pub claim_amount: Decimal,
    /// Status
    pub status: ClaimStatus,
    /// Owning user
    pub user_id: UserId,
    /// Review stamp, absent until an admin reviews the claim
    pub review: Option<Review>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Claim {
    /// Creates a new pending claim
    ///
    /// # Errors
    ///
    /// `ClaimError::Validation` if the submission is malformed
    pub fn submit(submission: ClaimSubmission) -> Result<Self, ClaimError> {
        submission.validate()?;

        Ok(Self {
            id: ClaimId::new_v7(),
            claim_number: generate_claim_number(),
            description: submission.description,
            claim_amount: submission.claim_amount,
            status: ClaimStatus::Pending,
            user_id: submission.user_id,
            review: None,
            created_at: Utc::now(),
        })
    }

    /// Records a review decision
    ///
    /// Re-reviewing replaces the previous stamp.
    pub fn review(
        &mut self,
        status: ClaimStatus,
        comments: Option<String>,
        reviewer_id: UserId,
        policy: TransitionPolicy,
    ) -> Result<(), ClaimError> {
        if !policy.allows(self.status, status) {
            return Err(ClaimError::InvalidStatusTransition {
                from: self.status,
                to: status,
            });
        }
        self.status = status;
        self.review = Some(Review {
            reviewer_id,
            comments,
            reviewed_at: Utc::now(),
        });
        Ok(())
    }

    /// Admin who reviewed the claim
    pub fn reviewed_by(&self) -> Option<UserId> {
        self.review.as_ref().map(|r| r.reviewer_id)
    }

    /// When the claim was reviewed
    pub fn reviewed_at(&self) -> Option<DateTime<Utc>> {
        self.review.as_ref().map(|r| r.reviewed_at)
    }

    /// Review comments
    pub fn review_comments(&self) -> Option<&str> {
        self.review.as_ref().and_then(|r| r.comments.as_deref())
    }
}

/// Generates a claim number from the first eight hex digits of a random UUID
pub fn generate_claim_number() -> String {
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(CLAIM_NUMBER_SUFFIX_LEN)
        .collect();
    format!("{}{}", CLAIM_NUMBER_PREFIX, suffix.to_uppercase())
}

/// Checks the `CLM-[A-Z0-9]{8}` shape
pub fn is_valid_claim_number(value: &str) -> bool {
    match value.strip_prefix(CLAIM_NUMBER_PREFIX) {
        Some(suffix) => {
            suffix.len() == CLAIM_NUMBER_SUFFIX_LEN
                && suffix.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        }
        None => false,
    }
}
