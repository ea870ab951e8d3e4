//! Claims handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use core_kernel::{ClaimId, UserId};
use domain_claims::{ClaimStatus, ClaimView};

use super::parse_path_id;
use crate::dto::claims::{ClaimResponse, CreateClaimRequest, ReviewClaimRequest};
use crate::error::ApiError;
use crate::extract::ValidatedJson;
use crate::AppState;

fn to_responses(views: Vec<ClaimView>) -> Json<Vec<ClaimResponse>> {
    Json(views.into_iter().map(ClaimResponse::from).collect())
}

/// Submits a new claim
pub async fn create_claim(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateClaimRequest>,
) -> Result<(StatusCode, Json<ClaimResponse>), ApiError> {
    let view = state
        .lifecycle
        .create_claim(request.description, request.claim_amount, request.user_id.into())
        .await?;

    info!(claim_number = %view.claim_number, user_id = %view.user_id, "Claim submitted");
    Ok((StatusCode::CREATED, Json(view.into())))
}

/// Records an admin's review decision
pub async fn review_claim(
    State(state): State<AppState>,
    Path(claim_id): Path<String>,
    ValidatedJson(request): ValidatedJson<ReviewClaimRequest>,
) -> Result<Json<ClaimResponse>, ApiError> {
    let claim_id: ClaimId = parse_path_id(&claim_id, "claim")?;
    let view = state.lifecycle.review_claim(claim_id, request.into()).await?;

    info!(claim_number = %view.claim_number, status = %view.status, "Claim reviewed");
    Ok(Json(view.into()))
}

/// Lists every claim, newest first
pub async fn list_claims(
    State(state): State<AppState>,
) -> Result<Json<Vec<ClaimResponse>>, ApiError> {
    Ok(to_responses(state.lifecycle.list_all_claims().await?))
}

/// Gets a claim by id
pub async fn get_claim(
    State(state): State<AppState>,
    Path(claim_id): Path<String>,
) -> Result<Json<ClaimResponse>, ApiError> {
    let claim_id: ClaimId = parse_path_id(&claim_id, "claim")?;
    Ok(Json(state.lifecycle.get_claim_by_id(claim_id).await?.into()))
}

/// Gets a claim by its claim number
pub async fn get_claim_by_number(
    State(state): State<AppState>,
    Path(claim_number): Path<String>,
) -> Result<Json<ClaimResponse>, ApiError> {
    Ok(Json(state.lifecycle.get_claim_by_number(&claim_number).await?.into()))
}

/// Lists one user's claims, newest first
pub async fn list_claims_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<ClaimResponse>>, ApiError> {
    let user_id: UserId = parse_path_id(&user_id, "user")?;
    Ok(to_responses(state.lifecycle.list_claims_by_user(user_id).await?))
}

/// Lists claims in one status
pub async fn list_claims_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> Result<Json<Vec<ClaimResponse>>, ApiError> {
    let status: ClaimStatus = status
        .parse()
        .map_err(|e: domain_claims::ClaimError| ApiError::BadRequest(e.to_string()))?;
    Ok(to_responses(state.lifecycle.list_claims_by_status(status).await?))
}
