//! PostgreSQL Claim Store Adapter
//!
//! Implements `ClaimStore` on top of `ClaimsRepository`. The review stamp is
//! stored as three nullable columns; reviewer and review time must be set
//! together.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{ClaimId, DomainPort, HealthCheckResult, HealthCheckable, PortError, UserId};
use domain_claims::{Claim, ClaimStatus, ClaimStore, Review};

use crate::error::DatabaseError;
use crate::repositories::claims::{ClaimRow, ClaimStatus as DbClaimStatus, ClaimsRepository};

/// PostgreSQL-backed implementation of the ClaimStore port
#[derive(Debug, Clone)]
pub struct PostgresClaimStore {
    repository: ClaimsRepository,
    pool: PgPool,
}

impl PostgresClaimStore {
    /// Creates a new PostgreSQL claim store
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ClaimsRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresClaimStore {}

#[async_trait]
impl HealthCheckable for PostgresClaimStore {
    async fn health_check(&self) -> HealthCheckResult {
        super::ping(&self.pool, "postgres-claim-store").await
    }
}

#[async_trait]
impl ClaimStore for PostgresClaimStore {
    #[instrument(skip(self, claim), fields(claim_id = %claim.id))]
    async fn save(&self, claim: &Claim) -> Result<Claim, PortError> {
        debug!("Persisting claim");
        let row = self.repository.upsert(&claim_to_row(claim)).await?;
        Ok(row_to_claim(row)?)
    }

    async fn find_by_id(&self, id: ClaimId) -> Result<Option<Claim>, PortError> {
        match self.repository.find_by_id(id.into()).await? {
            Some(row) => Ok(Some(row_to_claim(row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_claim_number(&self, claim_number: &str) -> Result<Option<Claim>, PortError> {
        match self.repository.find_by_claim_number(claim_number).await? {
            Some(row) => Ok(Some(row_to_claim(row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Claim>, PortError> {
        rows_to_claims(self.repository.find_by_user(user_id.into()).await?)
    }

    async fn find_by_status(&self, status: ClaimStatus) -> Result<Vec<Claim>, PortError> {
        rows_to_claims(self.repository.find_by_status(status_to_db(status)).await?)
    }

    async fn list_all_ordered_by_created_desc(&self) -> Result<Vec<Claim>, PortError> {
        rows_to_claims(self.repository.list_all().await?)
    }

    async fn list_by_user_ordered_by_created_desc(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Claim>, PortError> {
        rows_to_claims(self.repository.find_by_user(user_id.into()).await?)
    }
}

fn status_to_db(status: ClaimStatus) -> DbClaimStatus {
    match status {
        ClaimStatus::Pending => DbClaimStatus::Pending,
        ClaimStatus::InProgress => DbClaimStatus::InProgress,
        ClaimStatus::Approved => DbClaimStatus::Approved,
        ClaimStatus::Rejected => DbClaimStatus::Rejected,
    }
}

fn status_from_db(status: DbClaimStatus) -> ClaimStatus {
    match status {
        DbClaimStatus::Pending => ClaimStatus::Pending,
        DbClaimStatus::InProgress => ClaimStatus::InProgress,
        DbClaimStatus::Approved => ClaimStatus::Approved,
        DbClaimStatus::Rejected => ClaimStatus::Rejected,
    }
}

fn claim_to_row(claim: &Claim) -> ClaimRow {
    ClaimRow {
        claim_id: claim.id.into(),
        claim_number: claim.claim_number.clone(),
        description: claim.description.clone(),
        claim_amount: claim.claim_amount,
        status: status_to_db(claim.status),
        user_id: claim.user_id.into(),
        reviewed_by: claim.reviewed_by().map(Into::into),
        review_comments: claim.review_comments().map(str::to_string),
        created_at: claim.created_at,
        reviewed_at: claim.reviewed_at(),
    }
}

fn row_to_claim(row: ClaimRow) -> Result<Claim, DatabaseError> {
    let review = match (row.reviewed_by, row.reviewed_at) {
        (Some(reviewer), Some(reviewed_at)) => Some(Review {
            reviewer_id: UserId::from(reviewer),
            comments: row.review_comments,
            reviewed_at,
        }),
        (None, None) => None,
        _ => {
            return Err(DatabaseError::CorruptRow(format!(
                "claim {} has a partial review stamp",
                row.claim_id
            )))
        }
    };

    Ok(Claim {
        id: ClaimId::from(row.claim_id),
        claim_number: row.claim_number,
        description: row.description,
        claim_amount: row.claim_amount,
        status: status_from_db(row.status),
        user_id: UserId::from(row.user_id),
        review,
        created_at: row.created_at,
    })
}

fn rows_to_claims(rows: Vec<ClaimRow>) -> Result<Vec<Claim>, PortError> {
    rows.into_iter()
        .map(|row| row_to_claim(row).map_err(PortError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_claims::{ClaimSubmission, TransitionPolicy};
    use rust_decimal_macros::dec;

    fn claim() -> Claim {
        Claim::submit(ClaimSubmission::new("burst pipe", dec!(1200.50), UserId::new())).unwrap()
    }

    #[test]
    fn test_unreviewed_round_trip() {
        let claim = claim();
        let back = row_to_claim(claim_to_row(&claim)).unwrap();
        assert_eq!(back, claim);
    }

    #[test]
    fn test_reviewed_round_trip() {
        let mut claim = claim();
        claim
            .review(ClaimStatus::InProgress, Some("checking".into()), UserId::new(), TransitionPolicy::Permissive)
            .unwrap();

        let row = claim_to_row(&claim);
        assert_eq!(row.status, DbClaimStatus::InProgress);
        assert!(row.reviewed_by.is_some() && row.reviewed_at.is_some());
        assert_eq!(row_to_claim(row).unwrap(), claim);
    }

    #[test]
    fn test_partial_review_stamp_is_rejected() {
        let mut row = claim_to_row(&claim());
        row.reviewed_by = Some(uuid::Uuid::new_v4());

        assert!(matches!(row_to_claim(row), Err(DatabaseError::CorruptRow(_))));
    }
}
