//! Read projection returned to callers
//!
//! A `ClaimView` is a claim plus the display names of its owner and
//! reviewer. Names come from one explicit directory lookup per request,
//! collected into [`DisplayNames`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, UserId};
use domain_users::User;

use crate::claim::{Claim, ClaimStatus};
use crate::error::ClaimError;

/// Denormalized, read-only view of a claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimView {
    pub id: ClaimId,
    pub claim_number: String,
    pub description: String,
    pub claim_amount: Decimal,
    pub status: ClaimStatus,
    pub user_id: UserId,
    pub user_name: String,
    pub reviewed_by_id: Option<UserId>,
    pub reviewed_by_name: Option<String>,
    pub review_comments: Option<String>,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

/// User id to display name lookup for one batch of claims
#[derive(Debug, Clone, Default)]
pub struct DisplayNames {
    names: HashMap<UserId, String>,
}

impl DisplayNames {
    /// Builds the lookup from directory records
    pub fn from_users<I>(users: I) -> Self
    where
        I: IntoIterator<Item = User>,
    {
        Self {
            names: users
                .into_iter()
                .map(|u| (u.id, u.full_name))
                .collect(),
        }
    }

    /// Display name of a user, if known
    pub fn get(&self, id: UserId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    /// Distinct user ids referenced by the claims, owners and reviewers
    pub fn referenced_ids<'a, I>(claims: I) -> Vec<UserId>
    where
        I: IntoIterator<Item = &'a Claim>,
    {
        let mut ids: Vec<UserId> = claims
            .into_iter()
            .flat_map(|c| std::iter::once(c.user_id).chain(c.reviewed_by()))
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }
}

impl ClaimView {
    /// Projects a claim using the resolved display names
    ///
    /// # Errors
    ///
    /// `ClaimError::UserNotFound` if the owner is missing from `names`. A
    /// missing reviewer only leaves `reviewed_by_name` empty.
    pub fn project(claim: &Claim, names: &DisplayNames) -> Result<Self, ClaimError> {
        let user_name = names
            .get(claim.user_id)
            .ok_or_else(|| ClaimError::UserNotFound(claim.user_id.to_string()))?
            .to_string();

        let reviewed_by_id = claim.reviewed_by();
        let reviewed_by_name = reviewed_by_id
            .and_then(|id| names.get(id))
            .map(str::to_string);

        Ok(Self {
            id: claim.id,
            claim_number: claim.claim_number.clone(),
            description: claim.description.clone(),
            claim_amount: claim.claim_amount,
            status: claim.status,
            user_id: claim.user_id,
            user_name,
            reviewed_by_id,
            reviewed_by_name,
            review_comments: claim.review_comments().map(str::to_string),
            created_at: claim.created_at,
            reviewed_at: claim.reviewed_at(),
        })
    }
}
