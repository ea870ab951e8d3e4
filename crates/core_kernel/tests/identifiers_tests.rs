//! Unit tests for the identifier newtypes
//!
//! Covers creation, parsing, conversion and display for user and claim ids.

use core_kernel::{ClaimId, UserId};
use proptest::prelude::*;
use uuid::Uuid;

mod user_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        assert_ne!(UserId::new(), UserId::new());
    }

    #[test]
    fn test_new_v7_generates_time_ordered_ids() {
        let id1 = UserId::new_v7();
        std::thread::sleep(std::time::Duration::from_millis(1));
        let id2 = UserId::new_v7();
        assert!(id1 < id2);
    }

    #[test]
    fn test_prefix() {
        assert_eq!(UserId::prefix(), "USR");
    }

    #[test]
    fn test_serializes_as_bare_uuid() {
        let uuid = Uuid::new_v4();
        let id = UserId::from(uuid);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!("USR-not-a-uuid".parse::<UserId>().is_err());
    }
}

mod claim_id_tests {
    use super::*;

    #[test]
    fn test_prefix_differs_from_claim_number_prefix() {
        assert_eq!(ClaimId::prefix(), "CLAIM");
        assert!(ClaimId::new().to_string().starts_with("CLAIM-"));
    }

    #[test]
    fn test_uuid_conversion() {
        let uuid = Uuid::new_v4();
        let claim_id = ClaimId::from(uuid);
        let back: Uuid = claim_id.into();
        assert_eq!(uuid, back);
        assert_eq!(*claim_id.as_uuid(), uuid);
    }

    #[test]
    fn test_wrong_prefix_is_rejected() {
        let uuid = Uuid::new_v4();
        assert!(format!("USR-{}", uuid).parse::<ClaimId>().is_err());
    }
}

proptest! {
    #[test]
    fn prop_display_then_parse_preserves_id(bytes in any::<[u8; 16]>()) {
        let id = ClaimId::from(Uuid::from_bytes(bytes));
        let parsed: ClaimId = id.to_string().parse().unwrap();
        prop_assert_eq!(parsed, id);
    }
}
