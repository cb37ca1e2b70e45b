use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::{auth::AuthUser, error::ApiResult, state::AppState};
use trackbuddy_core::{Error as CoreError, Profile, ProfileUpdate};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1))]
    pub first_name: Option<String>,
    #[validate(length(min = 1))]
    pub last_name: Option<String>,
    pub avatar: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(r: UpdateProfileRequest) -> Self {
        ProfileUpdate {
            first_name: r.first_name,
            last_name: r.last_name,
            avatar: r.avatar,
            tags: r.tags,
        }
    }
}

async fn load_profile(state: &AppState, user_id: uuid::Uuid) -> ApiResult<Profile> {
    let profile = state
        .store
        .get_profile(user_id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Profile not found".to_string()))?;
    Ok(profile)
}

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> ApiResult<Json<Profile>> {
    Ok(Json(load_profile(&state, user_id).await?))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> ApiResult<Json<Profile>> {
    let Json(payload) = payload?;
    payload.validate()?;

    let profile = state.store.update_profile(user_id, payload.into()).await?;
    tracing::info!("Updated profile for user {}", user_id);
    Ok(Json(profile))
}

pub async fn get_tags(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(load_profile(&state, user_id).await?.tags))
}
