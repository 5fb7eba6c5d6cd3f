//! # cursorbridge
//!
//! The mobile platform's synchronous relational API (database, cursor,
//! transaction, statement) on top of an embedded engine that has a single
//! connection, a flat transaction primitive and no cursor support.
//!
//! ## Key Features
//!
//! - **Serialized access**: every engine call runs under one lock, and a thread
//!   with an open transaction keeps other threads out until it ends
//! - **Nested transactions**: arbitrarily nested begin/end pairs map onto one
//!   physical transaction; an unsuccessful inner level rolls back the whole
//! - **Streaming cursors**: results arrive in slices of bounded size and are
//!   paged in as the cursor moves, in either direction
//! - **Platform errors**: engine failures are reported as the platform's SQLite
//!   failure kinds
//!
//! ## Example
//!
//! ```rust,no_run
//! use cursorbridge::{Cursor, SqliteEngine};
//!
//! # fn main() -> anyhow::Result<()> {
//! let db = SqliteEngine::open_in_memory()?;
//! db.exec_sql("create table cards (id integer primary key, due integer)", &[])?;
//!
//! let transaction = db.transaction()?;
//! db.insert_for_id("insert into cards (due) values (?)", &[5.into()])?;
//! transaction.mark_successful()?;
//! transaction.end()?;
//!
//! let mut cursor = db.query("select id, due from cards", &[])?;
//! while cursor.move_to_next()? {
//!     println!("card {} due {}", cursor.get_long(0)?, cursor.get_long(1)?);
//! }
//! # Ok(())
//! # }
//! ```

pub use cursorbridge_core::*;
pub use cursorbridge_proto::{FieldType, SequenceNumber, SqlValue};

#[cfg(feature = "sqlite")]
pub use cursorbridge_storage_sqlite::{SqliteConfig, SqliteEngine, SqliteEngineConfig, SqliteEngineError};
