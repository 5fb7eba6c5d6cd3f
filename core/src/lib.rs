//! The platform's synchronous relational API over a single-connection engine.
//!
//! Calls flow `Database` → [`ConcurrencyGuard`] → [`Session`] → [`Gateway`] →
//! [`Engine`]. The guard serializes every engine call and ties lock ownership
//! to open transactions; the session maps nested transactions onto the
//! engine's flat ones; cursors stream results in bounded slices.

pub mod config;
pub mod convert;
pub mod cursor;
pub mod database;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod library;
pub mod session;
pub mod statement;


pub use config::DatabaseConfig;
pub use cursor::{Cursor, MemoryCursor, StreamingCursor};
pub use database::{Conflict, Database};
pub use engine::{Engine, EngineHandle};
pub use error::{Error, Result, SqliteErrorKind, SqliteFailure};
pub use gateway::Gateway;
pub use guard::{ConcurrencyGuard, Transaction};
pub use library::{Library, LibraryState};
pub use session::{Session, SessionState, TransactionBackend};
pub use statement::Statement;

pub use cursorbridge_proto as proto;

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
