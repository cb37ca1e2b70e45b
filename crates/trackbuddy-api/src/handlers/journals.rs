use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{auth::AuthUser, error::ApiResult, handlers::MessageResponse, state::AppState};
use trackbuddy_core::{
    ensure_owner, Error as CoreError, Journal, JournalFilter, JournalSort, JournalUpdate,
    NewJournal,
};

#[derive(Debug, Default, Deserialize)]
pub struct JournalQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub favorite: Option<bool>,
    pub tag: Option<String>,
    pub sort: Option<JournalSort>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateJournalRequest {
    #[serde(default)]
    pub is_starred: bool,
    #[validate(range(min = 1, max = 5))]
    pub mood: i32,
    #[validate(length(min = 1))]
    pub standout: String,
    #[validate(length(min = 1))]
    pub went_well: String,
    #[validate(length(min = 1))]
    pub went_wrong: String,
    #[validate(length(min = 1))]
    pub better_next_time: String,
    #[serde(default)]
    pub excuses: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJournalRequest {
    pub is_starred: Option<bool>,
    #[validate(range(min = 1, max = 5))]
    pub mood: Option<i32>,
    #[validate(length(min = 1))]
    pub standout: Option<String>,
    #[validate(length(min = 1))]
    pub went_well: Option<String>,
    #[validate(length(min = 1))]
    pub went_wrong: Option<String>,
    #[validate(length(min = 1))]
    pub better_next_time: Option<String>,
    pub excuses: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Listing entry: the headline fields of a journal.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalBrief {
    pub id: Uuid,
    pub is_starred: bool,
    pub mood: i32,
    pub standout: String,
    pub tags: Vec<String>,
    pub day: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<Journal> for JournalBrief {
    fn from(j: Journal) -> Self {
        JournalBrief {
            id: j.id,
            is_starred: j.is_starred,
            mood: j.mood,
            standout: j.standout,
            tags: j.tags,
            day: j.day,
            created_at: j.created_at,
        }
    }
}

impl From<CreateJournalRequest> for NewJournal {
    fn from(r: CreateJournalRequest) -> Self {
        NewJournal {
            is_starred: r.is_starred,
            mood: r.mood,
            standout: r.standout,
            went_well: r.went_well,
            went_wrong: r.went_wrong,
            better_next_time: r.better_next_time,
            excuses: r.excuses,
            tags: r.tags,
        }
    }
}

impl From<UpdateJournalRequest> for JournalUpdate {
    fn from(r: UpdateJournalRequest) -> Self {
        JournalUpdate {
            is_starred: r.is_starred,
            mood: r.mood,
            standout: r.standout,
            went_well: r.went_well,
            went_wrong: r.went_wrong,
            better_next_time: r.better_next_time,
            excuses: r.excuses,
            tags: r.tags,
        }
    }
}

/// Fetch a journal the caller owns.
async fn owned_journal(state: &AppState, journal_id: Uuid, user_id: Uuid) -> ApiResult<Journal> {
    let journal = state
        .store
        .get_journal(journal_id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Journal not found".to_string()))?;
    ensure_owner(&journal, user_id)?;
    Ok(journal)
}

pub async fn list_journals(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    query: Result<Query<JournalQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<JournalBrief>>> {
    let Query(query) = query?;
    let filter = JournalFilter::new(
        query.year,
        query.month,
        query.favorite.unwrap_or(false),
        query.tag,
        query.sort.unwrap_or_default(),
    )?;

    let journals = state.store.list_journals(user_id, &filter).await?;
    Ok(Json(journals.into_iter().map(JournalBrief::from).collect()))
}

pub async fn get_journal(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<Journal>> {
    let Path(journal_id) = path?;
    Ok(Json(owned_journal(&state, journal_id, user_id).await?))
}

/// Write today's journal
pub async fn create_journal(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    payload: Result<Json<CreateJournalRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Journal>)> {
    let Json(payload) = payload?;
    payload.validate()?;

    let now = Utc::now();
    let journal = state
        .store
        .create_journal(user_id, payload.into(), state.days.day_of(now), now)
        .await?;

    tracing::info!("Created journal {} for user {}", journal.id, user_id);
    Ok((StatusCode::CREATED, Json(journal)))
}

pub async fn update_journal(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateJournalRequest>, JsonRejection>,
) -> ApiResult<Json<Journal>> {
    let Path(journal_id) = path?;
    let Json(payload) = payload?;
    payload.validate()?;

    owned_journal(&state, journal_id, user_id).await?;
    let journal = state
        .store
        .update_journal(journal_id, payload.into(), Utc::now())
        .await?;

    tracing::info!("Updated journal {}", journal_id);
    Ok(Json(journal))
}

pub async fn delete_journal(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Path(journal_id) = path?;

    owned_journal(&state, journal_id, user_id).await?;
    state.store.delete_journal(journal_id).await?;

    tracing::info!("Deleted journal {}", journal_id);
    Ok(Json(MessageResponse::new("Journal has been deleted")))
}
