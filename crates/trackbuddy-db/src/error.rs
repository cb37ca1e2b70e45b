use thiserror::Error;

/// SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for trackbuddy_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Sqlx(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                let message = match db_err.constraint() {
                    Some("users_email_key") => "This email already exists",
                    Some("journals_user_day_key") => "Journal for today already exists",
                    _ => "Duplicate entry",
                };
                trackbuddy_core::Error::DuplicateEntry(message.to_string())
            }
            other => trackbuddy_core::Error::Storage(other.to_string()),
        }
    }
}
