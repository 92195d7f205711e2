use thiserror::Error as ThisError;

/// Failure writing to the audit store. Never fatal to a comparison run.
#[derive(Debug, ThisError)]
pub enum AuditError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Ractor error: {0}")]
    RactorError(String),
}
