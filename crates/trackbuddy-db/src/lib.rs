pub mod error;
pub mod models;
pub mod repository;

// Re-exports
pub use error::{Error, Result};
pub use models::{
    HabitOverviewRecord, HabitRecord, JournalRecord, NotificationRecord, ProfileRecord, UserRecord,
};
pub use repository::Database;
