//! SQLite reference engine for cursorbridge
//!
//! Implements the cursorbridge [`Engine`](cursorbridge_core::Engine) boundary
//! on top of `rusqlite`, so the shim can be run and tested without a native
//! library. Each engine handle owns at most one open collection and the
//! paging state of at most one streaming query.
//!
//! # SQLite Version Requirements
//!
//! The engine refuses to load against SQLite older than 3.35.0. The `rusqlite`
//! crate with the "bundled" feature includes a compatible SQLite version.
//!
//! # Example
//!
//! ```rust,no_run
//! use cursorbridge_core::Cursor;
//! use cursorbridge_storage_sqlite::SqliteEngine;
//!
//! # fn main() -> anyhow::Result<()> {
//! let db = SqliteEngine::open_database("collection.db")?;
//! let mut cursor = db.query("select id, flds from notes", &[])?;
//! while cursor.move_to_next()? {
//!     println!("{} {}", cursor.get_long(0)?, cursor.get_string(1)?);
//! }
//! # Ok(())
//! # }
//! ```

mod backend;
mod connection;
mod engine;
mod error;
mod paging;
mod value;

pub use connection::{SqliteConfig, SqliteEngineConfig, DEFAULT_PAGE_SIZE_BYTES, DEFAULT_PRAGMAS};
pub use engine::{SqliteEngine, MIN_SQLITE_VERSION};
pub use error::SqliteEngineError;

#[cfg(test)]
#[ctor::ctor]
fn init_tracing() {
    use std::str::FromStr;
    // if LOG_LEVEL env var is set, use it
    if let Ok(level) = std::env::var("LOG_LEVEL") {
        tracing_subscriber::fmt().with_max_level(tracing::Level::from_str(&level).unwrap()).with_test_writer().init();
    } else {
        tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).with_test_writer().init();
    }
}
