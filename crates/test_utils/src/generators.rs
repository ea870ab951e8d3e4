//! Test Data Generators
//!
//! `fake`-backed users and proptest strategies for claim inputs.

use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::Name;
use fake::Fake;
use proptest::prelude::*;
use rust_decimal::Decimal;

use domain_claims::ClaimStatus;
use domain_users::{NewUser, UserRole};

/// Generates a valid user with a random, collision-resistant username
pub fn fake_user(role: UserRole) -> NewUser {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let username = format!("user_{}", &suffix[..12]);
    let full_name: String = Name().fake();
    let email: String = SafeEmail().fake();
    NewUser::new(username, email, full_name, role)
}

/// Generates a claim description
pub fn fake_description() -> String {
    Sentence(3..8).fake()
}

/// Strategy for strictly positive claim amounts with up to two decimals
pub fn positive_amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64, 0u32..=2u32).prop_map(|(m, s)| Decimal::new(m, s))
}

/// Strategy for amounts that must be rejected
pub fn non_positive_amount_strategy() -> impl Strategy<Value = Decimal> {
    (-100_000_000i64..=0i64, 0u32..=2u32).prop_map(|(m, s)| Decimal::new(m, s))
}

/// Strategy over every claim status
pub fn claim_status_strategy() -> impl Strategy<Value = ClaimStatus> {
    prop::sample::select(ClaimStatus::ALL.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_fake_users_validate() {
        for _ in 0..20 {
            let user = fake_user(UserRole::Regular);
            assert!(user.validate().is_ok(), "{:?}", user);
        }
    }

    proptest! {
        #[test]
        fn prop_positive_amounts_are_positive(amount in positive_amount_strategy()) {
            prop_assert!(amount > Decimal::ZERO);
        }

        #[test]
        fn prop_non_positive_amounts_are_not(amount in non_positive_amount_strategy()) {
            prop_assert!(amount <= Decimal::ZERO);
        }
    }
}
