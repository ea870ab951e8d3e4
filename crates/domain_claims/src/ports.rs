//! Claim Store Port
//!
//! `ClaimStore` persists claims keyed by id. `infra_db` provides the
//! PostgreSQL adapter; the in-memory mock below backs unit and HTTP tests.
//!
//! Every listing is ordered newest first, ties broken by id descending.

use async_trait::async_trait;

use core_kernel::{ClaimId, DomainPort, HealthCheckable, PortError, UserId};

use crate::claim::{Claim, ClaimStatus};

/// Persistence operations over claims
#[async_trait]
pub trait ClaimStore: DomainPort + HealthCheckable {
    /// Inserts or fully replaces a claim by id
    async fn save(&self, claim: &Claim) -> Result<Claim, PortError>;

    /// Retrieves a claim by ID
    async fn find_by_id(&self, id: ClaimId) -> Result<Option<Claim>, PortError>;

    /// Retrieves a claim by its claim number
    async fn find_by_claim_number(&self, claim_number: &str) -> Result<Option<Claim>, PortError>;

    /// Claims owned by a user
    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Claim>, PortError>;

    /// Claims in a status
    async fn find_by_status(&self, status: ClaimStatus) -> Result<Vec<Claim>, PortError>;

    /// All claims, newest first
    async fn list_all_ordered_by_created_desc(&self) -> Result<Vec<Claim>, PortError>;

    /// A user's claims, newest first
    async fn list_by_user_ordered_by_created_desc(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Claim>, PortError>;
}

/// Sorts claims newest first, ties broken by id descending
pub fn sort_newest_first(claims: &mut [Claim]) {
    claims.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

/// Mock implementation of ClaimStore for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::HealthCheckResult;

    /// In-memory mock implementation of ClaimStore
    #[derive(Debug, Default, Clone)]
    pub struct MockClaimStore {
        claims: Arc<RwLock<HashMap<ClaimId, Claim>>>,
    }

    impl MockClaimStore {
        /// Creates an empty store
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of stored claims
        pub async fn len(&self) -> usize {
            self.claims.read().await.len()
        }

        /// Returns true if no claim is stored
        pub async fn is_empty(&self) -> bool {
            self.claims.read().await.is_empty()
        }

        async fn filtered<F>(&self, predicate: F) -> Vec<Claim>
        where
            F: Fn(&Claim) -> bool,
        {
            let mut claims: Vec<Claim> = self
                .claims
                .read()
                .await
                .values()
                .filter(|c| predicate(c))
                .cloned()
                .collect();
            sort_newest_first(&mut claims);
            claims
        }
    }

    impl DomainPort for MockClaimStore {}

    #[async_trait]
    impl HealthCheckable for MockClaimStore {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::healthy("mock-claim-store")
        }
    }

    #[async_trait]
    impl ClaimStore for MockClaimStore {
        async fn save(&self, claim: &Claim) -> Result<Claim, PortError> {
            let mut claims = self.claims.write().await;
            let number_taken = claims
                .values()
                .any(|c| c.claim_number == claim.claim_number && c.id != claim.id);
            if number_taken {
                return Err(PortError::conflict(format!(
                    "claim number '{}' already exists",
                    claim.claim_number
                )));
            }
            claims.insert(claim.id, claim.clone());
            Ok(claim.clone())
        }

        async fn find_by_id(&self, id: ClaimId) -> Result<Option<Claim>, PortError> {
            Ok(self.claims.read().await.get(&id).cloned())
        }

        async fn find_by_claim_number(&self, claim_number: &str) -> Result<Option<Claim>, PortError> {
            Ok(self
                .claims
                .read()
                .await
                .values()
                .find(|c| c.claim_number == claim_number)
                .cloned())
        }

        async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Claim>, PortError> {
            Ok(self.filtered(|c| c.user_id == user_id).await)
        }

        async fn find_by_status(&self, status: ClaimStatus) -> Result<Vec<Claim>, PortError> {
            Ok(self.filtered(|c| c.status == status).await)
        }

        async fn list_all_ordered_by_created_desc(&self) -> Result<Vec<Claim>, PortError> {
            Ok(self.filtered(|_| true).await)
        }

        async fn list_by_user_ordered_by_created_desc(
            &self,
            user_id: UserId,
        ) -> Result<Vec<Claim>, PortError> {
            Ok(self.filtered(|c| c.user_id == user_id).await)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockClaimStore;
    use super::*;
    use crate::claim::ClaimSubmission;
    use crate::transitions::TransitionPolicy;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn claim_for(user_id: UserId) -> Claim {
        Claim::submit(ClaimSubmission::new("water damage", dec!(500), user_id)).unwrap()
    }

    #[tokio::test]
    async fn test_save_is_upsert() {
        let store = MockClaimStore::new();
        let mut claim = claim_for(UserId::new());
        store.save(&claim).await.unwrap();

        claim
            .review(ClaimStatus::Approved, None, UserId::new(), TransitionPolicy::Permissive)
            .unwrap();
        store.save(&claim).await.unwrap();

        assert_eq!(store.len().await, 1);
        let stored = store.find_by_id(claim.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ClaimStatus::Approved);
    }

    #[tokio::test]
    async fn test_find_by_claim_number() {
        let store = MockClaimStore::new();
        let claim = claim_for(UserId::new());
        store.save(&claim).await.unwrap();

        let found = store.find_by_claim_number(&claim.claim_number).await.unwrap();
        assert_eq!(found.map(|c| c.id), Some(claim.id));
        assert!(store.find_by_claim_number("CLM-00000000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_claim_number_is_conflict() {
        let store = MockClaimStore::new();
        let first = claim_for(UserId::new());
        store.save(&first).await.unwrap();

        let mut second = claim_for(UserId::new());
        second.claim_number = first.claim_number.clone();

        assert!(store.save(&second).await.unwrap_err().is_conflict());
    }

    #[tokio::test]
    async fn test_listing_is_newest_first() {
        let store = MockClaimStore::new();
        let owner = UserId::new();

        let mut older = claim_for(owner);
        older.created_at -= Duration::minutes(5);
        let newer = claim_for(owner);
        let other = claim_for(UserId::new());

        store.save(&older).await.unwrap();
        store.save(&newer).await.unwrap();
        store.save(&other).await.unwrap();

        let mine = store.list_by_user_ordered_by_created_desc(owner).await.unwrap();
        let ids: Vec<_> = mine.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);

        let all = store.list_all_ordered_by_created_desc().await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all.last().map(|c| c.id), Some(older.id));
    }

    #[test]
    fn test_sort_breaks_ties_by_id() {
        let owner = UserId::new();
        let a = claim_for(owner);
        let mut b = claim_for(owner);
        b.created_at = a.created_at;

        let mut claims = vec![a.clone(), b.clone()];
        sort_newest_first(&mut claims);

        let expected_first = if a.id > b.id { a.id } else { b.id };
        assert_eq!(claims[0].id, expected_first);
    }
}
