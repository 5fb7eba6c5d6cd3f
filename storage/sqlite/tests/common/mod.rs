use std::{str::FromStr, sync::Arc};

#[allow(unused)]
pub use cursorbridge_core::{Cursor, Database, DatabaseConfig, Error, SqliteErrorKind};
#[allow(unused)]
pub use cursorbridge_storage_sqlite::{SqliteEngine, SqliteEngineConfig};
use tempfile::TempDir;
use tracing::Level;

// Initialize tracing for tests
#[ctor::ctor]
fn init_tracing() {
    // if LOG_LEVEL env var is set, use it
    if let Ok(level) = std::env::var("LOG_LEVEL") {
        tracing_subscriber::fmt().with_max_level(Level::from_str(&level).unwrap()).with_test_writer().init();
    } else {
        tracing_subscriber::fmt().with_max_level(Level::INFO).with_test_writer().init();
    }
}

/// A database over an on-disk collection in a fresh temporary directory.
/// Keep the directory alive for as long as the database is used.
#[allow(unused)]
pub fn collection(engine: SqliteEngineConfig, config: DatabaseConfig) -> anyhow::Result<(Database, TempDir)> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("collection.db");
    let db = Database::new(Arc::new(SqliteEngine::new(engine)), config);
    db.open(path.to_string_lossy())?;
    Ok((db, dir))
}

/// A table `numbers(n)` holding `0..count`
#[allow(unused)]
pub fn numbers(db: &Database, count: i64) -> anyhow::Result<()> {
    db.exec_sql("create table numbers (n integer primary key, label text)", &[])?;
    db.begin_transaction()?;
    for n in 0..count {
        db.insert_for_id("insert into numbers (n, label) values (?, ?)", &[n.into(), format!("row {}", n).into()])?;
    }
    db.set_transaction_successful()?;
    db.end_transaction()?;
    Ok(())
}
