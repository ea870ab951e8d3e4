//! Pre-built Test Fixtures
//!
//! Predictable users and claims for unit tests, plus a harness wiring the
//! services over in-memory adapters.

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use domain_claims::{
    ClaimLifecycle, ClaimSubmission, MockClaimStore, NotificationDispatcher, TransitionPolicy,
};
use domain_users::{MockUserDirectory, NewUser, User, UserRole, UserService};
use core_kernel::UserId;
use infra_notify::BroadcastHub;

/// Fixture for user test data
pub struct UserFixtures;

impl UserFixtures {
    /// A regular claimant
    pub fn alice() -> NewUser {
        NewUser::new("alice", "alice@example.com", "Alice Liddell", UserRole::Regular)
    }

    /// A second regular claimant
    pub fn carol() -> NewUser {
        NewUser::new("carol", "carol@example.com", "Carol Danvers", UserRole::Regular)
    }

    /// An admin who reviews claims
    pub fn bob() -> NewUser {
        NewUser::new("bob", "bob@example.com", "Bob Admin", UserRole::Admin)
    }
}

/// Fixture for claim test data
pub struct ClaimFixtures;

impl ClaimFixtures {
    /// A typical claim amount
    pub fn amount() -> Decimal {
        dec!(1500.00)
    }

    /// A valid submission for the given owner
    pub fn submission(user_id: UserId) -> ClaimSubmission {
        ClaimSubmission::new("Rear-ended at a traffic light", Self::amount(), user_id)
    }
}

/// Services wired over in-memory adapters and a live broadcast hub
#[derive(Clone)]
pub struct TestHarness {
    pub users: UserService,
    pub lifecycle: ClaimLifecycle,
    pub hub: BroadcastHub,
    pub user_directory: MockUserDirectory,
    pub claim_store: MockClaimStore,
}

impl TestHarness {
    /// Creates a harness with the permissive transition policy
    pub fn new() -> Self {
        Self::with_policy(TransitionPolicy::Permissive)
    }

    /// Creates a harness with the given transition policy
    pub fn with_policy(policy: TransitionPolicy) -> Self {
        let user_directory = MockUserDirectory::new();
        let claim_store = MockClaimStore::new();
        let hub = BroadcastHub::default();

        let users = UserService::new(Arc::new(user_directory.clone()));
        let lifecycle = ClaimLifecycle::new(
            Arc::new(claim_store.clone()),
            Arc::new(user_directory.clone()),
            NotificationDispatcher::new(Arc::new(hub.clone())),
        )
        .with_transition_policy(policy);

        Self {
            users,
            lifecycle,
            hub,
            user_directory,
            claim_store,
        }
    }

    /// Provisions a user through the service
    ///
    /// # Panics
    ///
    /// Panics if the user cannot be created
    pub async fn provision(&self, user: NewUser) -> User {
        self.users
            .create(user)
            .await
            .expect("fixture user should be valid and unique")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
