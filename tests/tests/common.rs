use std::{path::PathBuf, str::FromStr, sync::Arc};

#[allow(unused)]
pub use cursorbridge::{Conflict, Cursor, Database, DatabaseConfig, Error, SqlValue, SqliteEngine, SqliteEngineConfig, SqliteErrorKind};
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

/// An open on-disk collection with a `notes(id, content)` table.
/// The directory must outlive the database.
#[allow(unused)]
pub struct TestCollection {
    pub db: Arc<Database>,
    pub path: PathBuf,
    _dir: TempDir,
}

#[allow(unused)]
impl TestCollection {
    pub fn new() -> anyhow::Result<Self> { Self::with_engine(SqliteEngineConfig::default()) }

    pub fn with_engine(engine: SqliteEngineConfig) -> anyhow::Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("collection.anki2");
        let db = Database::new(Arc::new(SqliteEngine::new(engine)), DatabaseConfig::default());
        db.open(path.to_string_lossy())?;
        db.exec_sql("create table notes (id integer primary key, content text)", &[])?;
        Ok(Self { db: Arc::new(db), path, _dir: dir })
    }

    pub fn insert(&self, id: i64) -> anyhow::Result<()> {
        self.db.insert_for_id("insert into notes (id, content) values (?, ?)", &[id.into(), format!("note {}", id).into()])?;
        Ok(())
    }

    pub fn ids(&self) -> anyhow::Result<Vec<i64>> {
        let mut cursor = self.db.query("select id from notes order by id", &[])?;
        let mut ids = Vec::new();
        while cursor.move_to_next()? {
            ids.push(cursor.get_long(0)?);
        }
        Ok(ids)
    }

    pub fn count(&self) -> anyhow::Result<i64> { Ok(self.db.compile_statement("select count(*) from notes").simple_query_for_long()?) }
}
