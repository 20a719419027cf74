use super::error_code::{self, WardenErrorCode};

/// Storage-layer errors for SQLite operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("database corruption detected: {details}")]
    CorruptionDetected { details: String },

    #[error("append-only table {table} rejected a mutation")]
    AppendOnlyViolation { table: String },
}

impl WardenErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::SqliteError { .. } => error_code::STORAGE_ERROR,
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            Self::CorruptionDetected { .. } => error_code::DB_CORRUPT,
            Self::AppendOnlyViolation { .. } => error_code::APPEND_ONLY_VIOLATION,
        }
    }
}
