//! Database connection management.
//!
//! The [`Database`] struct owns a [`rusqlite::Connection`] and guarantees that
//! migrations are run before any other operation.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use rusqlite::Connection;

use crate::error::{Result, StoreError};
use crate::{migrations, rows};

/// Wrapper around a [`rusqlite::Connection`].
pub struct Database {
    conn: Connection,
}

/// Platform data directory for QuoteVault, created on demand.
///
/// - Linux:   `~/.local/share/quotevault`
/// - macOS:   `~/Library/Application Support/app.quotevault.quotevault`
/// - Windows: `{FOLDERID_RoamingAppData}\quotevault\quotevault\data`
pub fn data_dir() -> Result<PathBuf> {
    let project_dirs =
        ProjectDirs::from("app", "quotevault", "quotevault").ok_or(StoreError::NoDataDir)?;
    let dir = project_dirs.data_dir().to_path_buf();
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Default location of the local database file.
pub fn default_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("quotevault.db"))
}

impl Database {
    /// Open (or create) the default application database.
    pub fn new() -> Result<Self> {
        let db_path = default_path()?;
        tracing::info!(path = %db_path.display(), "opening database");
        Self::open_at(&db_path)
    }

    /// Open (or create) a database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::init(conn)
    }

    /// Open a private in-memory database. Used by tests and dry runs.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        rows::register_functions(&conn)?;
        migrations::run_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Return a reference to the underlying `rusqlite::Connection`.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Return a mutable reference to the underlying connection.
    pub fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Return the filesystem path of the open database (if any).
    pub fn path(&self) -> Option<PathBuf> {
        self.conn
            .path()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }
}
