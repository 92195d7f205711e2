use dbcompare_core::Dialect;
use thiserror::Error as ThisError;

/// Failure talking to one of the compared databases.
#[derive(Debug, ThisError)]
#[error("{dialect} data access error: {message}")]
pub struct SourceError {
    pub dialect: Dialect,
    pub message: String,
}

impl SourceError {
    pub fn new(dialect: Dialect, message: impl Into<String>) -> Self {
        Self {
            dialect,
            message: message.into(),
        }
    }
}

impl From<oracle::Error> for SourceError {
    fn from(err: oracle::Error) -> Self {
        Self::new(Dialect::Oracle, err.to_string())
    }
}

impl From<sqlx::Error> for SourceError {
    fn from(err: sqlx::Error) -> Self {
        Self::new(Dialect::Postgres, err.to_string())
    }
}
