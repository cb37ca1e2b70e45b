pub mod day;
pub mod error;
pub mod habit;
pub mod journal;
pub mod ledger;
pub mod memory;
pub mod owner;
pub mod store;
pub mod user;

// Re-exports
pub use day::DayBoundary;
pub use error::{Error, LedgerError, Result};
pub use habit::{Habit, HabitOverview, HabitUpdate, NewHabit};
pub use journal::{Journal, JournalFilter, JournalSort, JournalUpdate, NewJournal};
pub use ledger::{DayRange, RepetitionLedger};
pub use memory::MemoryStore;
pub use owner::{ensure_owner, Owned};
pub use store::Store;
pub use user::{NewNotification, NewProfile, Notification, Profile, ProfileUpdate, User};
