use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::owner::Owned;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Journal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub is_starred: bool,
    /// 1 (worst) to 5 (best).
    pub mood: i32,
    pub standout: String,
    pub went_well: String,
    pub went_wrong: String,
    pub better_next_time: String,
    pub excuses: String,
    pub tags: Vec<String>,
    /// Calendar day the entry belongs to. One journal per user per day.
    pub day: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewJournal {
    pub is_starred: bool,
    pub mood: i32,
    pub standout: String,
    pub went_well: String,
    pub went_wrong: String,
    pub better_next_time: String,
    pub excuses: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalUpdate {
    pub is_starred: Option<bool>,
    pub mood: Option<i32>,
    pub standout: Option<String>,
    pub went_well: Option<String>,
    pub went_wrong: Option<String>,
    pub better_next_time: Option<String>,
    pub excuses: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl Journal {
    pub fn new(user_id: Uuid, journal: NewJournal, day: NaiveDate, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            is_starred: journal.is_starred,
            mood: journal.mood,
            standout: journal.standout,
            went_well: journal.went_well,
            went_wrong: journal.went_wrong,
            better_next_time: journal.better_next_time,
            excuses: journal.excuses,
            tags: journal.tags,
            day,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: JournalUpdate, now: DateTime<Utc>) {
        if let Some(is_starred) = update.is_starred {
            self.is_starred = is_starred;
        }
        if let Some(mood) = update.mood {
            self.mood = mood;
        }
        if let Some(standout) = update.standout {
            self.standout = standout;
        }
        if let Some(went_well) = update.went_well {
            self.went_well = went_well;
        }
        if let Some(went_wrong) = update.went_wrong {
            self.went_wrong = went_wrong;
        }
        if let Some(better_next_time) = update.better_next_time {
            self.better_next_time = better_next_time;
        }
        if let Some(excuses) = update.excuses {
            self.excuses = excuses;
        }
        if let Some(tags) = update.tags {
            self.tags = tags;
        }
        self.updated_at = now;
    }
}

impl Owned for Journal {
    fn owner(&self) -> Uuid {
        self.user_id
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JournalSort {
    #[default]
    Newest,
    Oldest,
    MoodAsc,
    MoodDesc,
}

impl JournalSort {
    pub fn sort(&self, journals: &mut [Journal]) {
        match self {
            JournalSort::Newest => journals.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            JournalSort::Oldest => journals.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            JournalSort::MoodAsc => journals.sort_by(|a, b| {
                a.mood.cmp(&b.mood).then(b.created_at.cmp(&a.created_at))
            }),
            JournalSort::MoodDesc => journals.sort_by(|a, b| {
                b.mood.cmp(&a.mood).then(b.created_at.cmp(&a.created_at))
            }),
        }
    }
}

/// Listing criteria for a user's journals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JournalFilter {
    year: Option<i32>,
    month: Option<u32>,
    favorite: bool,
    tag: Option<String>,
    sort: JournalSort,
}

impl JournalFilter {
    pub fn new(
        year: Option<i32>,
        month: Option<u32>,
        favorite: bool,
        tag: Option<String>,
        sort: JournalSort,
    ) -> Result<Self> {
        if let Some(month) = month {
            if !(1..=12).contains(&month) {
                return Err(Error::Validation(format!("Invalid month: {}", month)));
            }
            if year.is_none() {
                return Err(Error::Validation("Month filter requires a year".to_string()));
            }
        }

        Ok(Self {
            year,
            month,
            favorite,
            tag: tag.filter(|t| !t.is_empty()),
            sort,
        })
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    pub fn month(&self) -> Option<u32> {
        self.month
    }

    pub fn favorite(&self) -> bool {
        self.favorite
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn sort(&self) -> JournalSort {
        self.sort
    }

    pub fn matches(&self, journal: &Journal) -> bool {
        if let Some(year) = self.year {
            if journal.day.year() != year {
                return false;
            }
        }
        if let Some(month) = self.month {
            if journal.day.month() != month {
                return false;
            }
        }
        if self.favorite && !journal.is_starred {
            return false;
        }
        if let Some(tag) = &self.tag {
            if !journal.tags.iter().any(|t| t == tag) {
                return false;
            }
        }
        true
    }

    /// Filter and order `journals` in place.
    pub fn apply(&self, journals: &mut Vec<Journal>) {
        journals.retain(|j| self.matches(j));
        self.sort.sort(journals);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn journal(day: (i32, u32, u32), mood: i32, starred: bool, tags: &[&str]) -> Journal {
        let date = NaiveDate::from_ymd_opt(day.0, day.1, day.2).unwrap();
        let created = Utc.with_ymd_and_hms(day.0, day.1, day.2, 12, 0, 0).unwrap();
        Journal::new(
            Uuid::new_v4(),
            NewJournal {
                is_starred: starred,
                mood,
                standout: "s".to_string(),
                went_well: "w".to_string(),
                went_wrong: "x".to_string(),
                better_next_time: "b".to_string(),
                excuses: String::new(),
                tags: tags.iter().map(|t| t.to_string()).collect(),
            },
            date,
            created,
        )
    }

    fn fixtures() -> Vec<Journal> {
        vec![
            journal((2024, 1, 5), 3, false, &["work"]),
            journal((2024, 2, 1), 5, true, &["family"]),
            journal((2024, 2, 14), 1, true, &["work", "family"]),
            journal((2023, 2, 20), 4, false, &[]),
        ]
    }

    fn moods(journals: &[Journal]) -> Vec<i32> {
        journals.iter().map(|j| j.mood).collect()
    }

    #[test]
    fn test_default_filter_sorts_newest_first() {
        let mut journals = fixtures();
        JournalFilter::default().apply(&mut journals);
        assert_eq!(moods(&journals), vec![1, 5, 3, 4]);
    }

    #[test]
    fn test_month_and_year_filter() {
        let mut journals = fixtures();
        JournalFilter::new(Some(2024), Some(2), false, None, JournalSort::Oldest)
            .unwrap()
            .apply(&mut journals);
        assert_eq!(moods(&journals), vec![5, 1]);

        let mut journals = fixtures();
        JournalFilter::new(Some(2023), None, false, None, JournalSort::Newest)
            .unwrap()
            .apply(&mut journals);
        assert_eq!(moods(&journals), vec![4]);
    }

    #[test]
    fn test_favorite_and_tag_filter() {
        let mut journals = fixtures();
        JournalFilter::new(None, None, true, Some("work".to_string()), JournalSort::Newest)
            .unwrap()
            .apply(&mut journals);
        assert_eq!(moods(&journals), vec![1]);
    }

    #[test]
    fn test_mood_sorts() {
        let mut journals = fixtures();
        JournalSort::MoodAsc.sort(&mut journals);
        assert_eq!(moods(&journals), vec![1, 3, 4, 5]);

        JournalSort::MoodDesc.sort(&mut journals);
        assert_eq!(moods(&journals), vec![5, 4, 3, 1]);
    }

    #[test]
    fn test_invalid_month_filters() {
        let bad_month = JournalFilter::new(Some(2024), Some(13), false, None, JournalSort::Newest);
        assert!(bad_month.is_err());

        let no_year = JournalFilter::new(None, Some(4), false, None, JournalSort::Newest);
        assert!(no_year.is_err());
    }

    #[test]
    fn test_sort_parses_camel_case() {
        let sort: JournalSort = serde_json::from_str("\"moodDesc\"").unwrap();
        assert_eq!(sort, JournalSort::MoodDesc);
    }
}
