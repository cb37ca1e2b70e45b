use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    auth::{hash_password, verify_password, AuthUser},
    error::{ApiError, ApiResult},
    handlers::MessageResponse,
    state::AppState,
};
use trackbuddy_core::{Error as CoreError, NewProfile, User};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

fn invalid_credentials() -> ApiError {
    ApiError::BadRequest("Invalid credentials".to_string())
}

/// Create an account and its empty profile
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TokenResponse>)> {
    let Json(payload) = payload?;
    payload.validate()?;

    let password_hash = hash_password(payload.password, state.bcrypt_cost).await?;
    let user = User::new(payload.email.trim().to_lowercase(), password_hash);
    let user = state
        .store
        .create_user(
            user,
            NewProfile {
                first_name: payload.first_name,
                last_name: payload.last_name,
            },
        )
        .await?;

    tracing::info!("Registered user {}", user.id);
    let token = state.jwt.issue(user.id)?;
    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<TokenResponse>> {
    let Json(payload) = payload?;
    payload.validate()?;

    let user = state
        .store
        .find_user_by_email(&payload.email.trim().to_lowercase())
        .await?
        .ok_or_else(invalid_credentials)?;

    if !verify_password(payload.password, user.password_hash).await? {
        tracing::warn!("Failed login for user {}", user.id);
        return Err(invalid_credentials());
    }

    let token = state.jwt.issue(user.id)?;
    Ok(Json(TokenResponse { token }))
}

/// Issue a fresh token for the current session
pub async fn refresh(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> ApiResult<Json<TokenResponse>> {
    let user = state
        .store
        .get_user(user_id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Unable to reauthorize".to_string()))?;

    let token = state.jwt.issue(user.id)?;
    Ok(Json(TokenResponse { token }))
}

pub async fn delete_account(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> ApiResult<Json<MessageResponse>> {
    state.store.delete_user(user_id).await?;

    tracing::info!("Deleted user {}", user_id);
    Ok(Json(MessageResponse::new("Account has been deleted")))
}
