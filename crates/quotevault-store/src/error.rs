use quotevault_shared::QuoteVaultError;
use thiserror::Error;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite error.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to determine a platform data directory.
    #[error("Could not determine application data directory")]
    NoDataDir,

    /// Generic I/O error (e.g. creating the database directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A query expected exactly one row but found none.
    #[error("Record not found")]
    NotFound,

    /// A unique constraint rejected the row.
    #[error("{0} already exists")]
    Duplicate(&'static str),

    /// Migration failure.
    #[error("Migration error: {0}")]
    Migration(String),

    /// Seed file could not be parsed.
    #[error("Seed file error: {0}")]
    Seed(#[from] serde_json::Error),
}

impl StoreError {
    /// Maps a unique/primary key violation to [`StoreError::Duplicate`].
    pub(crate) fn from_insert(e: rusqlite::Error, what: &'static str) -> Self {
        if let rusqlite::Error::SqliteFailure(ref failure, _) = e {
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
            {
                return StoreError::Duplicate(what);
            }
        }
        StoreError::Sqlite(e)
    }

    pub(crate) fn from_query(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
            other => StoreError::Sqlite(other),
        }
    }
}

impl From<StoreError> for QuoteVaultError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(what) => QuoteVaultError::AlreadyExists(what.to_string()),
            StoreError::NotFound => QuoteVaultError::NotFound("Record".to_string()),
            StoreError::Seed(e) => QuoteVaultError::Decode(e.to_string()),
            other => QuoteVaultError::Storage(other.to_string()),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
