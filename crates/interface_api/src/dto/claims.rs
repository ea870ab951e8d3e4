//! Claims DTOs

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use domain_claims::{ClaimStatus, ClaimView, ReviewDecision};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_create_claim"))]
pub struct CreateClaimRequest {
    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    pub description: String,
    pub claim_amount: Decimal,
    pub user_id: Uuid,
}

fn validate_create_claim(request: &CreateClaimRequest) -> Result<(), ValidationError> {
    if request.description.trim().is_empty() {
        let mut error = ValidationError::new("blank_description");
        error.message = Some(Cow::from("description is required"));
        return Err(error);
    }
    if request.claim_amount <= Decimal::ZERO {
        let mut error = ValidationError::new("non_positive_amount");
        error.message = Some(Cow::from("claim amount must be greater than 0"));
        return Err(error);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReviewClaimRequest {
    pub status: ClaimStatus,
    #[validate(length(max = 2000, message = "review comments must be at most 2000 characters"))]
    pub review_comments: Option<String>,
    pub admin_id: Uuid,
}

impl From<ReviewClaimRequest> for ReviewDecision {
    fn from(request: ReviewClaimRequest) -> Self {
        ReviewDecision {
            status: request.status,
            comments: request.review_comments,
            reviewer_id: request.admin_id.into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResponse {
    pub id: Uuid,
    pub claim_number: String,
    pub description: String,
    /// Exact decimal string, e.g. `"1500.00"`
    pub claim_amount: Decimal,
    pub status: ClaimStatus,
    pub user_name: String,
    pub user_id: Uuid,
    pub reviewed_by_id: Option<Uuid>,
    pub reviewed_by_name: Option<String>,
    pub review_comments: Option<String>,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl From<ClaimView> for ClaimResponse {
    fn from(view: ClaimView) -> Self {
        Self {
            id: view.id.into(),
            claim_number: view.claim_number,
            description: view.description,
            claim_amount: view.claim_amount,
            status: view.status,
            user_name: view.user_name,
            user_id: view.user_id.into(),
            reviewed_by_id: view.reviewed_by_id.map(Into::into),
            reviewed_by_name: view.reviewed_by_name,
            review_comments: view.review_comments,
            created_at: view.created_at,
            reviewed_at: view.reviewed_at,
        }
    }
}
