use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use trackbuddy_core::{Habit, HabitOverview, Journal, Notification, Profile, User};

#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ProfileRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub avatar: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct JournalRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub is_starred: bool,
    pub mood: i32,
    pub standout: String,
    pub went_well: String,
    pub went_wrong: String,
    pub better_next_time: String,
    pub excuses: String,
    pub tags: Vec<String>,
    pub day: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Habit row without its `repetitions` column.
#[derive(Debug, Clone, FromRow)]
pub struct HabitRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub color: String,
    pub duration: i32,
    pub frequency: i32,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct HabitOverviewRecord {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub duration: i32,
    pub frequency: i32,
    pub newest_repetition: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct NotificationRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        User {
            id: r.id,
            email: r.email,
            password_hash: r.password_hash,
            created_at: r.created_at,
        }
    }
}

impl From<ProfileRecord> for Profile {
    fn from(r: ProfileRecord) -> Self {
        Profile {
            id: r.id,
            user_id: r.user_id,
            first_name: r.first_name,
            last_name: r.last_name,
            avatar: r.avatar,
            tags: r.tags,
        }
    }
}

impl From<JournalRecord> for Journal {
    fn from(r: JournalRecord) -> Self {
        Journal {
            id: r.id,
            user_id: r.user_id,
            is_starred: r.is_starred,
            mood: r.mood,
            standout: r.standout,
            went_well: r.went_well,
            went_wrong: r.went_wrong,
            better_next_time: r.better_next_time,
            excuses: r.excuses,
            tags: r.tags,
            day: r.day,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

impl From<HabitRecord> for Habit {
    fn from(r: HabitRecord) -> Self {
        Habit {
            id: r.id,
            user_id: r.user_id,
            name: r.name,
            color: r.color,
            duration: r.duration,
            frequency: r.frequency,
            description: r.description,
            created_at: r.created_at,
        }
    }
}

impl From<HabitOverviewRecord> for HabitOverview {
    fn from(r: HabitOverviewRecord) -> Self {
        HabitOverview {
            id: r.id,
            name: r.name,
            color: r.color,
            duration: r.duration,
            frequency: r.frequency,
            newest_repetition: r.newest_repetition,
        }
    }
}

impl From<NotificationRecord> for Notification {
    fn from(r: NotificationRecord) -> Self {
        Notification {
            id: r.id,
            user_id: r.user_id,
            title: r.title,
            text: r.text,
            created_at: r.created_at,
        }
    }
}
