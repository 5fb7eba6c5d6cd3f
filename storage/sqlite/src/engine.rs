use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc,
    },
};

use cursorbridge_core::{Database, DatabaseConfig, Engine, EngineHandle, Library};
use cursorbridge_proto::{decode, encode, encode_error, BackendError, DbRequest};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::{backend::Backend, connection::SqliteEngineConfig, error::SqliteEngineError};

/// Oldest SQLite release the engine runs against (3.35.0, for `RETURNING`)
pub const MIN_SQLITE_VERSION: i32 = 3_035_000;

static SQLITE: Library = Library::new("sqlite");

/// An [`Engine`] serving each handle from its own SQLite backend
pub struct SqliteEngine {
    config: SqliteEngineConfig,
    backends: Mutex<HashMap<i64, Arc<Mutex<Backend>>>>,
    next_handle: AtomicI64,
}

impl SqliteEngine {
    pub fn new(config: SqliteEngineConfig) -> Self { Self { config, backends: Mutex::new(HashMap::new()), next_handle: AtomicI64::new(1) } }

    /// A database on a fresh engine with default settings, with `path` open
    pub fn open_database(path: impl Into<String>) -> anyhow::Result<Database> {
        let database = Database::new(Arc::new(Self::new(SqliteEngineConfig::default())), DatabaseConfig::default());
        database.open(path)?;
        Ok(database)
    }

    /// An in-memory database on a fresh engine
    pub fn open_in_memory() -> anyhow::Result<Database> { Self::open_database(":memory:") }

    /// Number of handles currently open
    pub fn open_handles(&self) -> usize { self.backends.lock().len() }

    fn backend(&self, handle: EngineHandle) -> Result<Arc<Mutex<Backend>>, SqliteEngineError> {
        self.backends.lock().get(&handle.0).cloned().ok_or(SqliteEngineError::UnknownHandle(handle.0))
    }

    fn dispatch(&self, handle: EngineHandle, request: &[u8]) -> Result<Vec<u8>, SqliteEngineError> {
        let request: DbRequest = decode(request)?;
        let backend = self.backend(handle)?;
        let response = backend.lock().handle(request)?;
        Ok(encode(&response)?)
    }
}

impl Default for SqliteEngine {
    fn default() -> Self { Self::new(SqliteEngineConfig::default()) }
}

impl Engine for SqliteEngine {
    fn load(&self) -> Result<(), String> {
        SQLITE.ensure_loaded(|| {
            let version = rusqlite::version_number();
            if version < MIN_SQLITE_VERSION {
                return Err(format!("SQLite {} is older than the required 3.35.0", rusqlite::version()));
            }
            debug!("using SQLite {}", rusqlite::version());
            Ok(())
        })
    }

    fn open(&self) -> Result<EngineHandle, Vec<u8>> {
        let handle = self.next_handle.fetch_add(1, Ordering::Relaxed);
        self.backends.lock().insert(handle, Arc::new(Mutex::new(Backend::new(&self.config))));
        debug!("opened backend {}", handle);
        Ok(EngineHandle(handle))
    }

    fn run(&self, handle: EngineHandle, request: &[u8]) -> Result<Vec<u8>, Vec<u8>> {
        self.dispatch(handle, request).map_err(|err| encode_error(&BackendError::from(&err)))
    }

    fn close(&self, handle: EngineHandle) {
        match self.backends.lock().remove(&handle.0) {
            Some(_) => debug!("closed backend {}", handle.0),
            None => warn!("close of unknown backend {}", handle.0),
        }
    }
}
