//! Error taxonomy for catalog persistence.

use chrono::{DateTime, Utc};
use rusqlite::ErrorCode;
use thiserror::Error;

use crate::schema::SchemaError;

/// Errors surfaced by every catalog operation.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Game has no name")]
    GameWithNullName,

    #[error("Game '{0}' has no ROM, disk, tape, harddisk, laserdisc or script")]
    GameWithMissingMedia(String),

    #[error("Game '{0}' already exists")]
    GameAlreadyExists(String),

    #[error("Game '{0}' not found")]
    GameNotFound(String),

    #[error("Database has no name")]
    DatabaseNullName,

    #[error("Database '{0}' already exists")]
    DatabaseAlreadyExists(String),

    #[error("Database '{0}' not found")]
    DatabaseNotFound(String),

    #[error("Database '{0}' already has the maximum number of backups")]
    DatabaseMaxBackupsReached(String),

    #[error("Game '{game}' of '{database}' is already a favorite")]
    FavoriteAlreadyExists { game: String, database: String },

    #[error("Backup of '{database}' taken at {timestamp} not found")]
    BackupNotFound {
        database: String,
        timestamp: DateTime<Utc>,
    },

    /// Any other storage failure
    #[error("Storage error: {0}")]
    Io(#[from] rusqlite::Error),

    /// The store could not be opened or migrated
    #[error("Storage error: {0}")]
    Schema(#[from] SchemaError),
}

/// One discriminant per failure condition, independent of the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    GameWithNullName,
    GameWithMissingMedia,
    GameAlreadyExists,
    GameNotFound,
    DatabaseNullName,
    DatabaseAlreadyExists,
    DatabaseNotFound,
    DatabaseMaxBackupsReached,
    FavoriteAlreadyExists,
    BackupNotFound,
    Io,
}

impl PersistenceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::GameWithNullName => ErrorKind::GameWithNullName,
            Self::GameWithMissingMedia(_) => ErrorKind::GameWithMissingMedia,
            Self::GameAlreadyExists(_) => ErrorKind::GameAlreadyExists,
            Self::GameNotFound(_) => ErrorKind::GameNotFound,
            Self::DatabaseNullName => ErrorKind::DatabaseNullName,
            Self::DatabaseAlreadyExists(_) => ErrorKind::DatabaseAlreadyExists,
            Self::DatabaseNotFound(_) => ErrorKind::DatabaseNotFound,
            Self::DatabaseMaxBackupsReached(_) => ErrorKind::DatabaseMaxBackupsReached,
            Self::FavoriteAlreadyExists { .. } => ErrorKind::FavoriteAlreadyExists,
            Self::BackupNotFound { .. } => ErrorKind::BackupNotFound,
            Self::Io(_) | Self::Schema(_) => ErrorKind::Io,
        }
    }
}

/// True when the store rejected a statement because of a UNIQUE or PRIMARY
/// KEY constraint.
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.code == ErrorCode::ConstraintViolation
                && matches!(
                    e.extended_code,
                    rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                        | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                )
        }
        _ => false,
    }
}

/// Map a store failure, turning uniqueness violations into `on_duplicate()`.
///
/// Everything else becomes [`PersistenceError::Io`] and is logged, since the
/// caller can only present it as a generic storage failure.
pub fn map_unique(
    err: rusqlite::Error,
    on_duplicate: impl FnOnce() -> PersistenceError,
) -> PersistenceError {
    if is_unique_violation(&err) {
        on_duplicate()
    } else {
        storage_failure(err)
    }
}

/// Log and wrap a storage failure.
pub fn storage_failure(err: rusqlite::Error) -> PersistenceError {
    log::warn!("Storage failure: {err}");
    PersistenceError::Io(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constraint(extended_code: i32) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: ErrorCode::ConstraintViolation,
                extended_code,
            },
            None,
        )
    }

    #[test]
    fn test_unique_violation_detected() {
        assert!(is_unique_violation(&constraint(
            rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        )));
        assert!(is_unique_violation(&constraint(
            rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        )));
    }

    #[test]
    fn test_foreign_key_is_not_unique_violation() {
        let err = constraint(rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY);
        assert!(!is_unique_violation(&err));
        let mapped = map_unique(err, || PersistenceError::GameAlreadyExists("x".into()));
        assert_eq!(mapped.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_map_unique_uses_duplicate_error() {
        let mapped = map_unique(constraint(rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE), || {
            PersistenceError::DatabaseAlreadyExists("Games".into())
        });
        assert_eq!(mapped.kind(), ErrorKind::DatabaseAlreadyExists);
        assert_eq!(mapped.to_string(), "Database 'Games' already exists");
    }

    #[test]
    fn test_other_errors_are_io() {
        let mapped = map_unique(rusqlite::Error::QueryReturnedNoRows, || {
            PersistenceError::GameAlreadyExists("x".into())
        });
        assert_eq!(mapped.kind(), ErrorKind::Io);
    }
}
