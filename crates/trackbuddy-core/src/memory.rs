use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    DayRange, Error, Habit, HabitOverview, HabitUpdate, Journal, JournalFilter, JournalUpdate,
    NewHabit, NewJournal, NewNotification, NewProfile, Notification, Profile, ProfileUpdate,
    RepetitionLedger, Result, Store, User,
};

#[derive(Debug, Clone)]
struct HabitEntry {
    habit: Habit,
    ledger: RepetitionLedger,
}

/// In-process store used when no database is configured, and by tests.
///
/// Ledger mutations run under the habits write lock, so check-ins on a
/// habit never interleave.
#[derive(Clone, Default)]
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    profiles: Arc<RwLock<HashMap<Uuid, Profile>>>,
    journals: Arc<RwLock<HashMap<Uuid, Journal>>>,
    habits: Arc<RwLock<HashMap<Uuid, HabitEntry>>>,
    notifications: Arc<RwLock<HashMap<Uuid, Notification>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn habit_not_found() -> Error {
    Error::NotFound("Habit not found".to_string())
}

fn journal_not_found() -> Error {
    Error::NotFound("Journal not found".to_string())
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, user: User, profile: NewProfile) -> Result<User> {
        {
            let mut users = self.users.write().await;
            if users.values().any(|u| u.email == user.email) {
                return Err(Error::DuplicateEntry("This email already exists".to_string()));
            }
            users.insert(user.id, user.clone());
        }

        let profile = Profile::new(user.id, profile);
        self.profiles.write().await.insert(user.id, profile);

        tracing::info!("Created user {}", user.id);
        Ok(user)
    }

    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<()> {
        if self.users.write().await.remove(&user_id).is_none() {
            return Err(Error::NotFound("Cannot find your profile".to_string()));
        }

        self.profiles.write().await.remove(&user_id);
        self.journals.write().await.retain(|_, j| j.user_id != user_id);
        self.habits.write().await.retain(|_, h| h.habit.user_id != user_id);
        self.notifications.write().await.retain(|_, n| n.user_id != user_id);

        tracing::info!("Deleted user {} and all owned records", user_id);
        Ok(())
    }

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
        Ok(self.profiles.read().await.get(&user_id).cloned())
    }

    async fn update_profile(&self, user_id: Uuid, update: ProfileUpdate) -> Result<Profile> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .get_mut(&user_id)
            .ok_or_else(|| Error::NotFound("Profile not found".to_string()))?;
        profile.apply(update);
        Ok(profile.clone())
    }

    async fn create_journal(
        &self,
        user_id: Uuid,
        journal: NewJournal,
        day: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Journal> {
        let mut journals = self.journals.write().await;
        if journals.values().any(|j| j.user_id == user_id && j.day == day) {
            return Err(Error::DuplicateEntry("Journal for today already exists".to_string()));
        }

        let journal = Journal::new(user_id, journal, day, now);
        journals.insert(journal.id, journal.clone());
        Ok(journal)
    }

    async fn get_journal(&self, journal_id: Uuid) -> Result<Option<Journal>> {
        Ok(self.journals.read().await.get(&journal_id).cloned())
    }

    async fn list_journals(&self, user_id: Uuid, filter: &JournalFilter) -> Result<Vec<Journal>> {
        let mut journals: Vec<Journal> = self
            .journals
            .read()
            .await
            .values()
            .filter(|j| j.user_id == user_id)
            .cloned()
            .collect();
        filter.apply(&mut journals);
        Ok(journals)
    }

    async fn update_journal(
        &self,
        journal_id: Uuid,
        update: JournalUpdate,
        now: DateTime<Utc>,
    ) -> Result<Journal> {
        let mut journals = self.journals.write().await;
        let journal = journals.get_mut(&journal_id).ok_or_else(journal_not_found)?;
        journal.apply(update, now);
        Ok(journal.clone())
    }

    async fn delete_journal(&self, journal_id: Uuid) -> Result<()> {
        self.journals
            .write()
            .await
            .remove(&journal_id)
            .map(|_| ())
            .ok_or_else(journal_not_found)
    }

    async fn create_habit(&self, user_id: Uuid, habit: NewHabit) -> Result<Habit> {
        let habit = Habit::new(user_id, habit);
        self.habits.write().await.insert(
            habit.id,
            HabitEntry {
                habit: habit.clone(),
                ledger: RepetitionLedger::new(),
            },
        );
        Ok(habit)
    }

    async fn get_habit(&self, habit_id: Uuid) -> Result<Option<Habit>> {
        Ok(self.habits.read().await.get(&habit_id).map(|e| e.habit.clone()))
    }

    async fn list_habit_overviews(&self, user_id: Uuid) -> Result<Vec<HabitOverview>> {
        let habits = self.habits.read().await;
        let mut owned: Vec<&HabitEntry> = habits
            .values()
            .filter(|e| e.habit.user_id == user_id)
            .collect();
        owned.sort_by(|a, b| {
            a.habit
                .created_at
                .cmp(&b.habit.created_at)
                .then(a.habit.id.cmp(&b.habit.id))
        });

        Ok(owned
            .into_iter()
            .map(|e| e.habit.overview(e.ledger.newest()))
            .collect())
    }

    async fn newest_repetition(&self, habit_id: Uuid) -> Result<i64> {
        let habits = self.habits.read().await;
        let entry = habits.get(&habit_id).ok_or_else(habit_not_found)?;
        Ok(entry.ledger.newest())
    }

    async fn update_habit(&self, habit_id: Uuid, update: HabitUpdate) -> Result<Habit> {
        let mut habits = self.habits.write().await;
        let entry = habits.get_mut(&habit_id).ok_or_else(habit_not_found)?;
        entry.habit.apply(update);
        Ok(entry.habit.clone())
    }

    async fn delete_habit(&self, habit_id: Uuid) -> Result<Habit> {
        self.habits
            .write()
            .await
            .remove(&habit_id)
            .map(|e| e.habit)
            .ok_or_else(habit_not_found)
    }

    async fn check_habit(&self, habit_id: Uuid, day: i64) -> Result<()> {
        let mut habits = self.habits.write().await;
        let entry = habits.get_mut(&habit_id).ok_or_else(habit_not_found)?;
        entry.ledger.check(day)?;
        Ok(())
    }

    async fn uncheck_habit(&self, habit_id: Uuid, day: i64) -> Result<()> {
        let mut habits = self.habits.write().await;
        let entry = habits.get_mut(&habit_id).ok_or_else(habit_not_found)?;
        entry.ledger.uncheck(day)?;
        Ok(())
    }

    async fn repetitions(&self, habit_id: Uuid, range: DayRange) -> Result<Vec<i64>> {
        let habits = self.habits.read().await;
        let entry = habits.get(&habit_id).ok_or_else(habit_not_found)?;
        Ok(entry.ledger.query(range).to_vec())
    }

    async fn create_notification(
        &self,
        user_id: Uuid,
        notification: NewNotification,
    ) -> Result<Notification> {
        let notification = Notification::new(user_id, notification);
        self.notifications
            .write()
            .await
            .insert(notification.id, notification.clone());
        Ok(notification)
    }

    async fn get_notification(&self, notification_id: Uuid) -> Result<Option<Notification>> {
        Ok(self.notifications.read().await.get(&notification_id).cloned())
    }

    async fn list_notifications(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        let mut notifications: Vec<Notification> = self
            .notifications
            .read()
            .await
            .values()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notifications)
    }

    async fn delete_notification(&self, notification_id: Uuid) -> Result<()> {
        self.notifications
            .write()
            .await
            .remove(&notification_id)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound("Notification not found".to_string()))
    }
}
