use std::time::Duration;
use thiserror::Error;

/// Failures raised by a repository. Services wrap these with context but never
/// swallow them.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("storage call exceeded {0:?}")]
    Timeout(Duration),
    #[error("duplicate value violates {0}")]
    Duplicate(String),
}

impl StoreError {
    /// Maps unique-constraint violations to `Duplicate` so callers can tell a
    /// conflict from an outage.
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Duplicate(db.constraint().unwrap_or("unique constraint").to_string())
            }
            _ => StoreError::Database(err),
        }
    }
}
