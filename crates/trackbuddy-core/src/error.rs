use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    DuplicateEntry(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failures of a single ledger mutation. The ledger is untouched when one is returned.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Habit already checked for {0}")]
    DuplicateEntry(i64),

    #[error("Repetition {0} not found")]
    NotFound(i64),
}

impl From<LedgerError> for Error {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::DuplicateEntry(_) => {
                Error::DuplicateEntry("Habit already checked".to_string())
            }
            LedgerError::NotFound(_) => {
                Error::NotFound("Repetition to uncheck not found".to_string())
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
