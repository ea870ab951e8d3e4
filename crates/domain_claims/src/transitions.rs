//! Status transition rules applied on review

use serde::{Deserialize, Serialize};

use crate::claim::ClaimStatus;

/// Which status changes a review may make
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
    /// Any status may be set from any other
    #[default]
    Permissive,
    /// Only forward moves; approved and rejected are final
    Strict,
}

impl TransitionPolicy {
    /// Checks whether a review may move a claim from `from` to `to`
    pub fn allows(&self, from: ClaimStatus, to: ClaimStatus) -> bool {
        match self {
            TransitionPolicy::Permissive => true,
            TransitionPolicy::Strict => strict_allows(from, to),
        }
    }

    /// Statuses reachable from `from` in one review
    pub fn targets(&self, from: ClaimStatus) -> Vec<ClaimStatus> {
        ClaimStatus::ALL
            .into_iter()
            .filter(|to| self.allows(from, *to))
            .collect()
    }
}

fn strict_allows(from: ClaimStatus, to: ClaimStatus) -> bool {
    use ClaimStatus::*;
    matches!(
        (from, to),
        (Pending, InProgress) |
        (Pending, Approved) |
        (Pending, Rejected) |
        (InProgress, Approved) |
        (InProgress, Rejected)
    )
}
