use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::owner::Owned;

/// Descriptive part of a habit. The repetition ledger is stored alongside
/// but never travels with this record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub color: String,
    pub duration: i32,
    /// Every N days.
    pub frequency: i32,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHabit {
    pub name: String,
    pub color: String,
    pub duration: i32,
    pub frequency: i32,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
    pub duration: Option<i32>,
    pub frequency: Option<i32>,
    pub description: Option<String>,
}

/// Per-habit summary used for listings: no ledger, only its newest entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitOverview {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub duration: i32,
    pub frequency: i32,
    /// `0` when the habit has never been checked.
    pub newest_repetition: i64,
}

impl Habit {
    pub fn new(user_id: Uuid, habit: NewHabit) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: habit.name,
            color: habit.color,
            duration: habit.duration,
            frequency: habit.frequency,
            description: habit.description,
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, update: HabitUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(color) = update.color {
            self.color = color;
        }
        if let Some(duration) = update.duration {
            self.duration = duration;
        }
        if let Some(frequency) = update.frequency {
            self.frequency = frequency;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
    }

    pub fn overview(&self, newest_repetition: i64) -> HabitOverview {
        HabitOverview {
            id: self.id,
            name: self.name.clone(),
            color: self.color.clone(),
            duration: self.duration,
            frequency: self.frequency,
            newest_repetition,
        }
    }
}

impl Owned for Habit {
    fn owner(&self) -> Uuid {
        self.user_id
    }
}
