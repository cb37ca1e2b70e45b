use crate::error::{Error, LedgerError, Result};
use serde::{de, Deserialize, Deserializer, Serialize};

/// Inclusive `[min, max]` window of day-timestamps.
///
/// Every read of a ledger goes through one of these, so the full
/// sequence is never handed out unfiltered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayRange {
    min: i64,
    max: i64,
}

impl<'de> Deserialize<'de> for DayRange {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            min: i64,
            max: i64,
        }

        let raw = Raw::deserialize(deserializer)?;
        DayRange::new(raw.min, raw.max).map_err(de::Error::custom)
    }
}

impl DayRange {
    pub fn new(min: i64, max: i64) -> Result<Self> {
        if min > max {
            return Err(Error::Validation("Invalid time period".to_string()));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn contains(&self, day: i64) -> bool {
        self.min <= day && day <= self.max
    }
}

/// Ascending, duplicate-free sequence of the days a habit was completed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepetitionLedger {
    days: Vec<i64>,
}

impl RepetitionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from persisted values, restoring order and uniqueness.
    pub fn from_persisted(mut days: Vec<i64>) -> Self {
        days.sort_unstable();
        days.dedup();
        Self { days }
    }

    /// Record a check-in for `day`.
    ///
    /// The value lands directly after the largest entry smaller than it,
    /// which is the front of the sequence when it is smaller than all of them.
    pub fn check(&mut self, day: i64) -> std::result::Result<(), LedgerError> {
        match self.days.binary_search(&day) {
            Ok(_) => Err(LedgerError::DuplicateEntry(day)),
            Err(index) => {
                self.days.insert(index, day);
                Ok(())
            }
        }
    }

    /// Remove the check-in for `day`.
    pub fn uncheck(&mut self, day: i64) -> std::result::Result<(), LedgerError> {
        match self.days.binary_search(&day) {
            Ok(index) => {
                self.days.remove(index);
                Ok(())
            }
            Err(_) => Err(LedgerError::NotFound(day)),
        }
    }

    /// Entries inside `range`, ascending.
    pub fn query(&self, range: DayRange) -> &[i64] {
        let start = self.days.partition_point(|&d| d < range.min());
        let end = self.days.partition_point(|&d| d <= range.max());
        &self.days[start..end]
    }

    /// Most recent check-in, or `0` for an empty ledger.
    pub fn newest(&self) -> i64 {
        self.days.last().copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Hand the sequence back for persistence.
    pub fn into_persisted(self) -> Vec<i64> {
        self.days
    }
}
