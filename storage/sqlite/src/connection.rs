//! Opening collection connections

use std::path::PathBuf;

use rusqlite::Connection;

use crate::error::SqliteEngineError;

/// Where a collection lives
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SqliteConfig {
    /// File-based database
    File(PathBuf),
    /// In-memory database (for testing)
    Memory,
}

impl SqliteConfig {
    /// `:memory:` selects an in-memory database, anything else is a file path
    pub fn from_path(path: &str) -> Self {
        match path {
            ":memory:" => SqliteConfig::Memory,
            path => SqliteConfig::File(PathBuf::from(path)),
        }
    }
}

pub const DEFAULT_PAGE_SIZE_BYTES: u64 = 2 * 1024 * 1024;

pub const DEFAULT_PRAGMAS: &str = "PRAGMA journal_mode=WAL;
     PRAGMA synchronous=NORMAL;
     PRAGMA foreign_keys=ON;
     PRAGMA cache_size=-64000;
     PRAGMA temp_store=MEMORY;";

#[derive(Clone, Debug)]
pub struct SqliteEngineConfig {
    /// Initial upper bound on the size of one streaming result slice
    pub page_size_bytes: u64,
    /// Executed on every newly opened collection
    pub pragmas: String,
}

impl Default for SqliteEngineConfig {
    fn default() -> Self { Self { page_size_bytes: DEFAULT_PAGE_SIZE_BYTES, pragmas: DEFAULT_PRAGMAS.to_owned() } }
}

impl SqliteEngineConfig {
    pub fn page_size_bytes(mut self, bytes: u64) -> Self {
        self.page_size_bytes = bytes;
        self
    }

    pub fn pragmas(mut self, pragmas: impl Into<String>) -> Self {
        self.pragmas = pragmas.into();
        self
    }
}

pub(crate) fn open_connection(config: &SqliteConfig, pragmas: &str) -> Result<Connection, SqliteEngineError> {
    let conn = match config {
        SqliteConfig::File(path) => Connection::open(path)?,
        SqliteConfig::Memory => Connection::open_in_memory()?,
    };
    if !pragmas.is_empty() {
        conn.execute_batch(pragmas)?;
    }
    Ok(conn)
}
