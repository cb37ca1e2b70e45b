use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    DayRange, Habit, HabitOverview, HabitUpdate, Journal, JournalFilter, JournalUpdate,
    NewHabit, NewJournal, NewNotification, NewProfile, Notification, Profile, ProfileUpdate,
    Result, User,
};

/// Persistence seam shared by the in-memory store and the PostgreSQL repository.
///
/// Lookups return `Ok(None)` for absent records; mutations of absent
/// records fail with `Error::NotFound`. Ownership is checked by callers.
#[async_trait]
pub trait Store: Send + Sync {
    // Users and profiles

    /// Create a user together with its profile. Fails with `DuplicateEntry`
    /// when the email is taken.
    async fn create_user(&self, user: User, profile: NewProfile) -> Result<User>;

    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Delete a user and everything they own.
    async fn delete_user(&self, user_id: Uuid) -> Result<()>;

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>>;

    async fn update_profile(&self, user_id: Uuid, update: ProfileUpdate) -> Result<Profile>;

    // Journals

    /// Store a journal for `day`. Fails with `DuplicateEntry` when the user
    /// already has one for that day.
    async fn create_journal(
        &self,
        user_id: Uuid,
        journal: NewJournal,
        day: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Journal>;

    async fn get_journal(&self, journal_id: Uuid) -> Result<Option<Journal>>;

    async fn list_journals(&self, user_id: Uuid, filter: &JournalFilter) -> Result<Vec<Journal>>;

    async fn update_journal(
        &self,
        journal_id: Uuid,
        update: JournalUpdate,
        now: DateTime<Utc>,
    ) -> Result<Journal>;

    async fn delete_journal(&self, journal_id: Uuid) -> Result<()>;

    // Habits

    async fn create_habit(&self, user_id: Uuid, habit: NewHabit) -> Result<Habit>;

    async fn get_habit(&self, habit_id: Uuid) -> Result<Option<Habit>>;

    async fn list_habit_overviews(&self, user_id: Uuid) -> Result<Vec<HabitOverview>>;

    async fn newest_repetition(&self, habit_id: Uuid) -> Result<i64>;

    async fn update_habit(&self, habit_id: Uuid, update: HabitUpdate) -> Result<Habit>;

    async fn delete_habit(&self, habit_id: Uuid) -> Result<Habit>;

    /// Add `day` to the habit's ledger. Writes to one habit are serialized.
    async fn check_habit(&self, habit_id: Uuid, day: i64) -> Result<()>;

    /// Remove `day` from the habit's ledger. Writes to one habit are serialized.
    async fn uncheck_habit(&self, habit_id: Uuid, day: i64) -> Result<()>;

    async fn repetitions(&self, habit_id: Uuid, range: DayRange) -> Result<Vec<i64>>;

    // Notifications

    async fn create_notification(
        &self,
        user_id: Uuid,
        notification: NewNotification,
    ) -> Result<Notification>;

    async fn get_notification(&self, notification_id: Uuid) -> Result<Option<Notification>>;

    async fn list_notifications(&self, user_id: Uuid) -> Result<Vec<Notification>>;

    async fn delete_notification(&self, notification_id: Uuid) -> Result<()>;
}
