//! User directory handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use core_kernel::UserId;
use domain_users::{User, UserRole};

use super::parse_path_id;
use crate::dto::users::{CreateUserRequest, UserResponse};
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::AppState;

fn to_responses(users: Vec<User>) -> Json<Vec<UserResponse>> {
    Json(users.into_iter().map(UserResponse::from).collect())
}

/// Provisions a user
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = state.users.create(request.into()).await?;

    info!(user_id = %user.id, username = %user.username, role = %user.role, "User provisioned");
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Lists all users
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    Ok(to_responses(state.users.list_all().await?))
}

/// Gets a user by id
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user_id: UserId = parse_path_id(&user_id, "user")?;
    Ok(Json(state.users.get_by_id(user_id).await?.into()))
}

/// Gets a user by username
pub async fn get_user_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    Ok(Json(state.users.get_by_username(&username).await?.into()))
}

/// Lists users holding one role
pub async fn list_users_by_role(
    State(state): State<AppState>,
    Path(role): Path<String>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let role: UserRole = role.parse().map_err(ApiError::BadRequest)?;
    Ok(to_responses(state.users.list_by_role(role).await?))
}
