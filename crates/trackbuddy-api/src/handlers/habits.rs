use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    handlers::MessageResponse,
    state::AppState,
};
use trackbuddy_core::{
    ensure_owner, DayRange, Error as CoreError, Habit, HabitOverview, HabitUpdate, NewHabit,
};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateHabitRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub color: String,
    #[validate(range(min = 0))]
    pub duration: i32,
    #[validate(range(min = 1))]
    pub frequency: i32,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHabitRequest {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub color: Option<String>,
    #[validate(range(min = 0))]
    pub duration: Option<i32>,
    #[validate(range(min = 1))]
    pub frequency: Option<i32>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub day: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

/// A habit together with its most recent check-in (`0` if none).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitDetail {
    #[serde(flatten)]
    pub habit: Habit,
    pub newest_repetition: i64,
}

impl From<CreateHabitRequest> for NewHabit {
    fn from(r: CreateHabitRequest) -> Self {
        NewHabit {
            name: r.name,
            color: r.color,
            duration: r.duration,
            frequency: r.frequency,
            description: r.description,
        }
    }
}

impl From<UpdateHabitRequest> for HabitUpdate {
    fn from(r: UpdateHabitRequest) -> Self {
        HabitUpdate {
            name: r.name,
            color: r.color,
            duration: r.duration,
            frequency: r.frequency,
            description: r.description,
        }
    }
}

async fn owned_habit(state: &AppState, habit_id: Uuid, user_id: Uuid) -> ApiResult<Habit> {
    let habit = state
        .store
        .get_habit(habit_id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Habit not found".to_string()))?;
    ensure_owner(&habit, user_id)?;
    Ok(habit)
}

fn required_day(query: DayQuery) -> ApiResult<i64> {
    query
        .day
        .ok_or_else(|| ApiError::BadRequest("Timestamp not included".to_string()))
}

pub async fn list_habits(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> ApiResult<Json<Vec<HabitOverview>>> {
    let habits = state.store.list_habit_overviews(user_id).await?;
    Ok(Json(habits))
}

pub async fn create_habit(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    payload: Result<Json<CreateHabitRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<HabitDetail>)> {
    let Json(payload) = payload?;
    payload.validate()?;

    let habit = state.store.create_habit(user_id, payload.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(HabitDetail {
            habit,
            newest_repetition: 0,
        }),
    ))
}

pub async fn get_habit(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<HabitDetail>> {
    let Path(habit_id) = path?;

    let habit = owned_habit(&state, habit_id, user_id).await?;
    let newest_repetition = state.store.newest_repetition(habit_id).await?;
    Ok(Json(HabitDetail {
        habit,
        newest_repetition,
    }))
}

pub async fn update_habit(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateHabitRequest>, JsonRejection>,
) -> ApiResult<Json<Habit>> {
    let Path(habit_id) = path?;
    let Json(payload) = payload?;
    payload.validate()?;

    owned_habit(&state, habit_id, user_id).await?;
    let habit = state.store.update_habit(habit_id, payload.into()).await?;

    tracing::info!("Updated habit {}", habit_id);
    Ok(Json(habit))
}

pub async fn delete_habit(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<Habit>> {
    let Path(habit_id) = path?;

    owned_habit(&state, habit_id, user_id).await?;
    let habit = state.store.delete_habit(habit_id).await?;

    tracing::info!("Deleted habit {}", habit_id);
    Ok(Json(habit))
}

/// Record a completion of the habit on `day`
pub async fn check_habit(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<DayQuery>, QueryRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Path(habit_id) = path?;
    let Query(query) = query?;
    let day = required_day(query)?;

    if state.days.is_future(day, Utc::now()) {
        return Err(ApiError::BadRequest("Cannot check for the future".to_string()));
    }

    owned_habit(&state, habit_id, user_id).await?;
    state.store.check_habit(habit_id, day).await?;

    tracing::info!("Checked habit {} for {}", habit_id, day);
    Ok(Json(MessageResponse::new("Habit checked")))
}

/// Remove a completion previously recorded on `day`
pub async fn uncheck_habit(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<DayQuery>, QueryRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Path(habit_id) = path?;
    let Query(query) = query?;
    let day = required_day(query)?;

    owned_habit(&state, habit_id, user_id).await?;
    state.store.uncheck_habit(habit_id, day).await?;

    tracing::info!("Unchecked habit {} for {}", habit_id, day);
    Ok(Json(MessageResponse::new("Habit unchecked")))
}

pub async fn get_repetitions(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<RangeQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<i64>>> {
    let Path(habit_id) = path?;
    let Query(query) = query?;

    let range = match (query.min, query.max) {
        (Some(min), Some(max)) => DayRange::new(min, max)?,
        _ => return Err(CoreError::Validation("Invalid time period".to_string()).into()),
    };

    owned_habit(&state, habit_id, user_id).await?;
    let repetitions = state.store.repetitions(habit_id, range).await?;
    Ok(Json(repetitions))
}
