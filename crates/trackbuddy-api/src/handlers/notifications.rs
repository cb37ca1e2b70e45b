use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{auth::AuthUser, error::ApiResult, handlers::MessageResponse, state::AppState};
use trackbuddy_core::{ensure_owner, Error as CoreError, NewNotification, Notification};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateNotificationRequest {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub text: String,
}

pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> ApiResult<Json<Vec<Notification>>> {
    Ok(Json(state.store.list_notifications(user_id).await?))
}

pub async fn create_notification(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    payload: Result<Json<CreateNotificationRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Notification>)> {
    let Json(payload) = payload?;
    payload.validate()?;

    let notification = state
        .store
        .create_notification(
            user_id,
            NewNotification {
                title: payload.title,
                text: payload.text,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(notification)))
}

pub async fn delete_notification(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Path(notification_id) = path?;

    let notification = state
        .store
        .get_notification(notification_id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Notification not found".to_string()))?;
    ensure_owner(&notification, user_id)?;
    state.store.delete_notification(notification_id).await?;

    Ok(Json(MessageResponse::new("Notification has been deleted")))
}
