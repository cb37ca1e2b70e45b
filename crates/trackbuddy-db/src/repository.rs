use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{postgres::PgPoolOptions, Pool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    models::{
        HabitOverviewRecord, HabitRecord, JournalRecord, NotificationRecord, ProfileRecord,
        UserRecord,
    },
    Error, Result,
};
use trackbuddy_core::{
    DayRange, Habit, HabitOverview, HabitUpdate, Journal, JournalFilter, JournalSort,
    JournalUpdate, NewHabit, NewJournal, NewNotification, NewProfile, Notification, Profile,
    ProfileUpdate, RepetitionLedger, Store, User,
};

type CoreResult<T> = trackbuddy_core::Result<T>;

const HABIT_COLUMNS: &str =
    "id, user_id, name, color, duration, frequency, description, created_at";

fn db_err(err: sqlx::Error) -> trackbuddy_core::Error {
    Error::Sqlx(err).into()
}

fn habit_not_found() -> trackbuddy_core::Error {
    trackbuddy_core::Error::NotFound("Habit not found".to_string())
}

fn journal_not_found() -> trackbuddy_core::Error {
    trackbuddy_core::Error::NotFound("Journal not found".to_string())
}

fn order_by(sort: JournalSort) -> &'static str {
    match sort {
        JournalSort::Newest => "created_at DESC",
        JournalSort::Oldest => "created_at ASC",
        JournalSort::MoodAsc => "mood ASC, created_at DESC",
        JournalSort::MoodDesc => "mood DESC, created_at DESC",
    }
}

/// Build the filtered listing query for a user's journals.
pub(crate) fn journal_list_query(
    user_id: Uuid,
    filter: &JournalFilter,
) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new("SELECT * FROM journals WHERE user_id = ");
    query.push_bind(user_id);

    if let Some(year) = filter.year() {
        query.push(" AND EXTRACT(YEAR FROM day)::INTEGER = ");
        query.push_bind(year);
    }
    if let Some(month) = filter.month() {
        query.push(" AND EXTRACT(MONTH FROM day)::INTEGER = ");
        query.push_bind(month as i32);
    }
    if filter.favorite() {
        query.push(" AND is_starred");
    }
    if let Some(tag) = filter.tag() {
        query.push(" AND ");
        query.push_bind(tag.to_string());
        query.push(" = ANY(tags)");
    }

    query.push(" ORDER BY ");
    query.push(order_by(filter.sort()));
    query
}

#[derive(Clone)]
pub struct Database {
    pool: Pool<Postgres>,
}

impl Database {
    /// Create new database connection
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Initialize database schema
    pub async fn init_schema(&self) -> Result<()> {
        let statements = [
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY,
                email TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                CONSTRAINT users_email_key UNIQUE (email)
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS profiles (
                id UUID PRIMARY KEY,
                user_id UUID NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                avatar TEXT NOT NULL DEFAULT '',
                tags TEXT[] NOT NULL DEFAULT '{}'
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS journals (
                id UUID PRIMARY KEY,
                user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                is_starred BOOLEAN NOT NULL DEFAULT FALSE,
                mood INTEGER NOT NULL CHECK (mood BETWEEN 1 AND 5),
                standout TEXT NOT NULL,
                went_well TEXT NOT NULL,
                went_wrong TEXT NOT NULL,
                better_next_time TEXT NOT NULL,
                excuses TEXT NOT NULL DEFAULT '',
                tags TEXT[] NOT NULL DEFAULT '{}',
                day DATE NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL,
                CONSTRAINT journals_user_day_key UNIQUE (user_id, day)
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS habits (
                id UUID PRIMARY KEY,
                user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                color TEXT NOT NULL,
                duration INTEGER NOT NULL,
                frequency INTEGER NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                repetitions BIGINT[] NOT NULL DEFAULT '{}',
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS notifications (
                id UUID PRIMARY KEY,
                user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                title TEXT NOT NULL,
                text TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
            "CREATE INDEX IF NOT EXISTS idx_habits_user_id ON habits(user_id)",
            r#"
            CREATE INDEX IF NOT EXISTS idx_journals_user_created
                ON journals(user_id, created_at DESC)
            "#,
            "CREATE INDEX IF NOT EXISTS idx_notifications_user_id ON notifications(user_id)",
        ];

        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| Error::Migration(e.to_string()))?;
        }

        tracing::info!("Database schema initialized");
        Ok(())
    }

    /// Load a habit's ledger under a row lock, mutate it, write it back.
    ///
    /// The row lock serializes concurrent check-ins on one habit; a failed
    /// mutation drops the transaction and leaves the row untouched.
    async fn mutate_ledger<F>(&self, habit_id: Uuid, mutate: F) -> CoreResult<()>
    where
        F: FnOnce(&mut RepetitionLedger) -> std::result::Result<(), trackbuddy_core::LedgerError>
            + Send,
    {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let stored: Option<Vec<i64>> =
            sqlx::query_scalar("SELECT repetitions FROM habits WHERE id = $1 FOR UPDATE")
                .bind(habit_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_err)?;

        let mut ledger = RepetitionLedger::from_persisted(stored.ok_or_else(habit_not_found)?);
        mutate(&mut ledger)?;

        sqlx::query("UPDATE habits SET repetitions = $1 WHERE id = $2")
            .bind(ledger.into_persisted())
            .bind(habit_id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;
        Ok(())
    }
}

#[async_trait]
impl Store for Database {
    // ========================================================================
    // User Operations
    // ========================================================================

    async fn create_user(&self, user: User, profile: NewProfile) -> CoreResult<User> {
        let profile = Profile::new(user.id, profile);
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query(
            "INSERT INTO users (id, email, password_hash, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        sqlx::query(
            r#"
            INSERT INTO profiles (id, user_id, first_name, last_name, avatar, tags)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(profile.id)
        .bind(profile.user_id)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.avatar)
        .bind(&profile.tags)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;
        Ok(user)
    }

    async fn get_user(&self, user_id: Uuid) -> CoreResult<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(record.map(User::from))
    }

    async fn find_user_by_email(&self, email: &str) -> CoreResult<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(record.map(User::from))
    }

    async fn delete_user(&self, user_id: Uuid) -> CoreResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(trackbuddy_core::Error::NotFound(
                "Cannot find your profile".to_string(),
            ));
        }
        Ok(())
    }

    async fn get_profile(&self, user_id: Uuid) -> CoreResult<Option<Profile>> {
        let record =
            sqlx::query_as::<_, ProfileRecord>("SELECT * FROM profiles WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;

        Ok(record.map(Profile::from))
    }

    async fn update_profile(&self, user_id: Uuid, update: ProfileUpdate) -> CoreResult<Profile> {
        let record = sqlx::query_as::<_, ProfileRecord>(
            r#"
            UPDATE profiles SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                avatar = COALESCE($4, avatar),
                tags = COALESCE($5, tags)
            WHERE user_id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(update.first_name)
        .bind(update.last_name)
        .bind(update.avatar)
        .bind(update.tags)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        record
            .map(Profile::from)
            .ok_or_else(|| trackbuddy_core::Error::NotFound("Profile not found".to_string()))
    }

    // ========================================================================
    // Journal Operations
    // ========================================================================

    async fn create_journal(
        &self,
        user_id: Uuid,
        journal: NewJournal,
        day: NaiveDate,
        now: DateTime<Utc>,
    ) -> CoreResult<Journal> {
        let journal = Journal::new(user_id, journal, day, now);

        sqlx::query(
            r#"
            INSERT INTO journals (
                id, user_id, is_starred, mood, standout, went_well, went_wrong,
                better_next_time, excuses, tags, day, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(journal.id)
        .bind(journal.user_id)
        .bind(journal.is_starred)
        .bind(journal.mood)
        .bind(&journal.standout)
        .bind(&journal.went_well)
        .bind(&journal.went_wrong)
        .bind(&journal.better_next_time)
        .bind(&journal.excuses)
        .bind(&journal.tags)
        .bind(journal.day)
        .bind(journal.created_at)
        .bind(journal.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(journal)
    }

    async fn get_journal(&self, journal_id: Uuid) -> CoreResult<Option<Journal>> {
        let record = sqlx::query_as::<_, JournalRecord>("SELECT * FROM journals WHERE id = $1")
            .bind(journal_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(record.map(Journal::from))
    }

    async fn list_journals(
        &self,
        user_id: Uuid,
        filter: &JournalFilter,
    ) -> CoreResult<Vec<Journal>> {
        let records = journal_list_query(user_id, filter)
            .build_query_as::<JournalRecord>()
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(records.into_iter().map(Journal::from).collect())
    }

    async fn update_journal(
        &self,
        journal_id: Uuid,
        update: JournalUpdate,
        now: DateTime<Utc>,
    ) -> CoreResult<Journal> {
        let record = sqlx::query_as::<_, JournalRecord>(
            r#"
            UPDATE journals SET
                is_starred = COALESCE($2, is_starred),
                mood = COALESCE($3, mood),
                standout = COALESCE($4, standout),
                went_well = COALESCE($5, went_well),
                went_wrong = COALESCE($6, went_wrong),
                better_next_time = COALESCE($7, better_next_time),
                excuses = COALESCE($8, excuses),
                tags = COALESCE($9, tags),
                updated_at = $10
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(journal_id)
        .bind(update.is_starred)
        .bind(update.mood)
        .bind(update.standout)
        .bind(update.went_well)
        .bind(update.went_wrong)
        .bind(update.better_next_time)
        .bind(update.excuses)
        .bind(update.tags)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        record.map(Journal::from).ok_or_else(journal_not_found)
    }

    async fn delete_journal(&self, journal_id: Uuid) -> CoreResult<()> {
        let result = sqlx::query("DELETE FROM journals WHERE id = $1")
            .bind(journal_id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(journal_not_found());
        }
        Ok(())
    }

    // ========================================================================
    // Habit Operations
    // ========================================================================

    async fn create_habit(&self, user_id: Uuid, habit: NewHabit) -> CoreResult<Habit> {
        let habit = Habit::new(user_id, habit);

        sqlx::query(
            r#"
            INSERT INTO habits (
                id, user_id, name, color, duration, frequency, description, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(habit.id)
        .bind(habit.user_id)
        .bind(&habit.name)
        .bind(&habit.color)
        .bind(habit.duration)
        .bind(habit.frequency)
        .bind(&habit.description)
        .bind(habit.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        tracing::info!("Created habit {} for user {}", habit.id, user_id);
        Ok(habit)
    }

    async fn get_habit(&self, habit_id: Uuid) -> CoreResult<Option<Habit>> {
        let record = sqlx::query_as::<_, HabitRecord>(&format!(
            "SELECT {} FROM habits WHERE id = $1",
            HABIT_COLUMNS
        ))
        .bind(habit_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(record.map(Habit::from))
    }

    async fn list_habit_overviews(&self, user_id: Uuid) -> CoreResult<Vec<HabitOverview>> {
        // The ledger is sorted, so its last element is the newest check-in.
        let records = sqlx::query_as::<_, HabitOverviewRecord>(
            r#"
            SELECT
                id, name, color, duration, frequency,
                COALESCE(repetitions[cardinality(repetitions)], 0)::BIGINT AS newest_repetition
            FROM habits
            WHERE user_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(records.into_iter().map(HabitOverview::from).collect())
    }

    async fn newest_repetition(&self, habit_id: Uuid) -> CoreResult<i64> {
        let newest: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT COALESCE(repetitions[cardinality(repetitions)], 0)::BIGINT
            FROM habits
            WHERE id = $1
            "#,
        )
        .bind(habit_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        newest.ok_or_else(habit_not_found)
    }

    async fn update_habit(&self, habit_id: Uuid, update: HabitUpdate) -> CoreResult<Habit> {
        let record = sqlx::query_as::<_, HabitRecord>(&format!(
            r#"
            UPDATE habits SET
                name = COALESCE($2, name),
                color = COALESCE($3, color),
                duration = COALESCE($4, duration),
                frequency = COALESCE($5, frequency),
                description = COALESCE($6, description)
            WHERE id = $1
            RETURNING {}
            "#,
            HABIT_COLUMNS
        ))
        .bind(habit_id)
        .bind(update.name)
        .bind(update.color)
        .bind(update.duration)
        .bind(update.frequency)
        .bind(update.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        record.map(Habit::from).ok_or_else(habit_not_found)
    }

    async fn delete_habit(&self, habit_id: Uuid) -> CoreResult<Habit> {
        let record = sqlx::query_as::<_, HabitRecord>(&format!(
            "DELETE FROM habits WHERE id = $1 RETURNING {}",
            HABIT_COLUMNS
        ))
        .bind(habit_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        record.map(Habit::from).ok_or_else(habit_not_found)
    }

    async fn check_habit(&self, habit_id: Uuid, day: i64) -> CoreResult<()> {
        self.mutate_ledger(habit_id, |ledger| ledger.check(day)).await
    }

    async fn uncheck_habit(&self, habit_id: Uuid, day: i64) -> CoreResult<()> {
        self.mutate_ledger(habit_id, |ledger| ledger.uncheck(day)).await
    }

    async fn repetitions(&self, habit_id: Uuid, range: DayRange) -> CoreResult<Vec<i64>> {
        let repetitions: Option<Vec<i64>> = sqlx::query_scalar(
            r#"
            SELECT ARRAY(
                SELECT r FROM unnest(repetitions) AS r
                WHERE r BETWEEN $2 AND $3
                ORDER BY r
            )
            FROM habits
            WHERE id = $1
            "#,
        )
        .bind(habit_id)
        .bind(range.min())
        .bind(range.max())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        repetitions.ok_or_else(habit_not_found)
    }

    // ========================================================================
    // Notification Operations
    // ========================================================================

    async fn create_notification(
        &self,
        user_id: Uuid,
        notification: NewNotification,
    ) -> CoreResult<Notification> {
        let notification = Notification::new(user_id, notification);

        sqlx::query(
            r#"
            INSERT INTO notifications (id, user_id, title, text, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(notification.id)
        .bind(notification.user_id)
        .bind(&notification.title)
        .bind(&notification.text)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(notification)
    }

    async fn get_notification(&self, notification_id: Uuid) -> CoreResult<Option<Notification>> {
        let record = sqlx::query_as::<_, NotificationRecord>(
            "SELECT * FROM notifications WHERE id = $1",
        )
        .bind(notification_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(record.map(Notification::from))
    }

    async fn list_notifications(&self, user_id: Uuid) -> CoreResult<Vec<Notification>> {
        let records = sqlx::query_as::<_, NotificationRecord>(
            "SELECT * FROM notifications WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(records.into_iter().map(Notification::from).collect())
    }

    async fn delete_notification(&self, notification_id: Uuid) -> CoreResult<()> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(notification_id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(trackbuddy_core::Error::NotFound(
                "Notification not found".to_string(),
            ));
        }
        Ok(())
    }
}
