//! Claim lifecycle manager
//!
//! `ClaimLifecycle` owns the rules of the claim state machine:
//!
//! ```text
//!   pending ──▶ in_progress ──▶ approved
//!      │                    └─▶ rejected
//!      └──────────▶ approved | rejected
//! ```
//!
//! Every operation resolves the users it touches through the directory port,
//! writes through the claim store, and only then publishes notifications.
//! A failed publish never undoes a write.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

use core_kernel::{ClaimId, UserId};
use domain_users::{User, UserDirectory};

use crate::claim::{Claim, ClaimStatus, ClaimSubmission};
use crate::error::ClaimError;
use crate::notifications::NotificationDispatcher;
use crate::ports::ClaimStore;
use crate::transitions::TransitionPolicy;
use crate::view::{ClaimView, DisplayNames};

/// Attempts at finding an unused claim number before giving up
const CLAIM_NUMBER_ATTEMPTS: usize = 3;

/// A review decision made by an admin
#[derive(Debug, Clone)]
pub struct ReviewDecision {
    pub status: ClaimStatus,
    pub comments: Option<String>,
    pub reviewer_id: UserId,
}

/// Application service for the claim lifecycle
#[derive(Clone)]
pub struct ClaimLifecycle {
    claims: Arc<dyn ClaimStore>,
    users: Arc<dyn UserDirectory>,
    notifications: NotificationDispatcher,
    transitions: TransitionPolicy,
}

impl ClaimLifecycle {
    /// Creates a lifecycle manager with the permissive transition policy
    pub fn new(
        claims: Arc<dyn ClaimStore>,
        users: Arc<dyn UserDirectory>,
        notifications: NotificationDispatcher,
    ) -> Self {
        Self {
            claims,
            users,
            notifications,
            transitions: TransitionPolicy::default(),
        }
    }

    /// Replaces the transition policy
    pub fn with_transition_policy(mut self, policy: TransitionPolicy) -> Self {
        self.transitions = policy;
        self
    }

    /// The active transition policy
    pub fn transition_policy(&self) -> TransitionPolicy {
        self.transitions
    }

    /// Submits a new claim on behalf of a user
    ///
    /// # Errors
    ///
    /// * `ClaimError::Validation` for a blank description or non-positive
    ///   amount, before anything is read or written
    /// * `ClaimError::UserNotFound` if the owner does not exist
    #[instrument(skip(self, description), fields(user_id = %user_id, amount = %claim_amount))]
    pub async fn create_claim(
        &self,
        description: String,
        claim_amount: Decimal,
        user_id: UserId,
    ) -> Result<ClaimView, ClaimError> {
        let submission = ClaimSubmission::new(description, claim_amount, user_id);
        submission.validate()?;

        let owner = self.require_user(user_id).await?;
        let claim = self.persist_new_claim(submission).await?;

        info!(claim_id = %claim.id, claim_number = %claim.claim_number, "Claim submitted");

        self.notifications
            .notify_user(owner.id, format!("Claim {} created successfully", claim.claim_number))
            .await;
        self.notifications
            .notify_admins(format!(
                "New claim {} submitted by {}",
                claim.claim_number,
                owner.display_name()
            ))
            .await;

        ClaimView::project(&claim, &DisplayNames::from_users([owner]))
    }

    /// Records an admin's review decision
    ///
    /// Checks run in order: claim exists, reviewer exists, reviewer is an
    /// admin, transition is allowed. Nothing is written unless all pass.
    #[instrument(skip(self, decision), fields(claim_id = %claim_id, status = %decision.status, reviewer_id = %decision.reviewer_id))]
    pub async fn review_claim(
        &self,
        claim_id: ClaimId,
        decision: ReviewDecision,
    ) -> Result<ClaimView, ClaimError> {
        let mut claim = self.require_claim(claim_id).await?;
        let reviewer = self.require_user(decision.reviewer_id).await?;

        if !reviewer.is_admin() {
            return Err(ClaimError::ReviewerNotAdmin(reviewer.username));
        }

        let previous = claim.status;
        claim.review(decision.status, decision.comments, reviewer.id, self.transitions)?;
        let claim = self.claims.save(&claim).await?;

        info!(from = %previous, to = %claim.status, "Claim reviewed");

        self.notifications
            .notify_user(
                claim.user_id,
                format!("Claim {} status updated to: {}", claim.claim_number, claim.status.label()),
            )
            .await;

        self.view_one(&claim).await
    }

    /// Retrieves a claim by ID
    pub async fn get_claim_by_id(&self, claim_id: ClaimId) -> Result<ClaimView, ClaimError> {
        let claim = self.require_claim(claim_id).await?;
        self.view_one(&claim).await
    }

    /// Retrieves a claim by its claim number
    pub async fn get_claim_by_number(&self, claim_number: &str) -> Result<ClaimView, ClaimError> {
        let claim = self
            .claims
            .find_by_claim_number(claim_number)
            .await?
            .ok_or_else(|| ClaimError::ClaimNotFound(claim_number.to_string()))?;
        self.view_one(&claim).await
    }

    /// Lists every claim, newest first
    pub async fn list_all_claims(&self) -> Result<Vec<ClaimView>, ClaimError> {
        let claims = self.claims.list_all_ordered_by_created_desc().await?;
        self.view_many(&claims).await
    }

    /// Lists a user's claims, newest first
    ///
    /// # Errors
    ///
    /// `ClaimError::UserNotFound` if the user does not exist
    pub async fn list_claims_by_user(&self, user_id: UserId) -> Result<Vec<ClaimView>, ClaimError> {
        self.require_user(user_id).await?;
        let claims = self.claims.list_by_user_ordered_by_created_desc(user_id).await?;
        self.view_many(&claims).await
    }

    /// Lists claims in a status, newest first
    pub async fn list_claims_by_status(
        &self,
        status: ClaimStatus,
    ) -> Result<Vec<ClaimView>, ClaimError> {
        let claims = self.claims.find_by_status(status).await?;
        self.view_many(&claims).await
    }

    async fn persist_new_claim(&self, submission: ClaimSubmission) -> Result<Claim, ClaimError> {
        let mut attempt = 1;
        loop {
            let claim = Claim::submit(submission.clone())?;
            match self.claims.save(&claim).await {
                Ok(saved) => return Ok(saved),
                Err(e) if e.is_conflict() && attempt < CLAIM_NUMBER_ATTEMPTS => {
                    warn!(claim_number = %claim.claim_number, attempt, "Claim number collision, regenerating");
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn require_claim(&self, claim_id: ClaimId) -> Result<Claim, ClaimError> {
        self.claims
            .find_by_id(claim_id)
            .await?
            .ok_or_else(|| ClaimError::ClaimNotFound(claim_id.to_string()))
    }

    async fn require_user(&self, user_id: UserId) -> Result<User, ClaimError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ClaimError::UserNotFound(user_id.to_string()))
    }

    async fn view_one(&self, claim: &Claim) -> Result<ClaimView, ClaimError> {
        let names = self.display_names(std::slice::from_ref(claim)).await?;
        ClaimView::project(claim, &names)
    }

    async fn view_many(&self, claims: &[Claim]) -> Result<Vec<ClaimView>, ClaimError> {
        let names = self.display_names(claims).await?;
        claims.iter().map(|c| ClaimView::project(c, &names)).collect()
    }

    async fn display_names(&self, claims: &[Claim]) -> Result<DisplayNames, ClaimError> {
        if claims.is_empty() {
            return Ok(DisplayNames::default());
        }
        let ids = DisplayNames::referenced_ids(claims);
        let users = self.users.find_by_ids(&ids).await?;
        Ok(DisplayNames::from_users(users))
    }
}
