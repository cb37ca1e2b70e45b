use crate::error::{Error, Result};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc};

/// Calendar-day convention shared by habit check-ins and journals.
///
/// Days are cut at midnight in a fixed offset from UTC (UTC unless configured).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBoundary {
    offset: FixedOffset,
}

impl DayBoundary {
    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    pub fn from_offset_minutes(minutes: i32) -> Result<Self> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(|offset| Self { offset })
            .ok_or_else(|| Error::Validation(format!("Invalid day offset: {} minutes", minutes)))
    }

    /// Calendar day that `at` falls on.
    pub fn day_of(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }

    /// First instant of `day`.
    pub fn start_of(&self, day: NaiveDate) -> DateTime<Utc> {
        let local_midnight = day.and_time(NaiveTime::MIN);
        let shift = Duration::seconds(i64::from(self.offset.local_minus_utc()));
        Utc.from_utc_datetime(&(local_midnight - shift))
    }

    /// Last millisecond of the day containing `now`, as epoch millis.
    pub fn end_of_today_millis(&self, now: DateTime<Utc>) -> i64 {
        match self.day_of(now).succ_opt() {
            Some(tomorrow) => self.start_of(tomorrow).timestamp_millis() - 1,
            None => i64::MAX,
        }
    }

    /// Whether `day_millis` lies after the end of the current day.
    pub fn is_future(&self, day_millis: i64, now: DateTime<Utc>) -> bool {
        day_millis > self.end_of_today_millis(now)
    }
}

impl Default for DayBoundary {
    fn default() -> Self {
        Self::utc()
    }
}
