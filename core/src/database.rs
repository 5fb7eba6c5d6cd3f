//! The platform's database object, expressed over the guarded gateway.

use std::sync::Arc;

use cursorbridge_proto::SqlValue;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::{
    config::DatabaseConfig,
    cursor::{Cursor, MemoryCursor, StreamingCursor},
    engine::Engine,
    error::{Error, Result},
    gateway::Gateway,
    guard::{ConcurrencyGuard, Transaction},
    statement::Statement,
};

/// Conflict resolution for [`Database::insert`] and [`Database::update`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Conflict {
    #[default]
    None,
    Rollback,
    Abort,
    Fail,
    Ignore,
    Replace,
}

impl Conflict {
    fn clause(self) -> &'static str {
        match self {
            Conflict::None => "",
            Conflict::Rollback => " OR ROLLBACK ",
            Conflict::Abort => " OR ABORT ",
            Conflict::Fail => " OR FAIL ",
            Conflict::Ignore => " OR IGNORE ",
            Conflict::Replace => " OR REPLACE ",
        }
    }
}

/// One logical database reached through a single engine instance.
///
/// All methods may be called from any thread. Calls are serialized, and a
/// thread with an open transaction excludes all others until it ends.
pub struct Database {
    guard: ConcurrencyGuard,
    config: DatabaseConfig,
    path: Mutex<Option<String>>,
}

impl Database {
    pub fn new(engine: Arc<dyn Engine>, config: DatabaseConfig) -> Self {
        Self { guard: ConcurrencyGuard::new(Gateway::new(engine)), config, path: Mutex::new(None) }
    }

    pub fn config(&self) -> &DatabaseConfig { &self.config }

    pub fn guard(&self) -> &ConcurrencyGuard { &self.guard }

    /// Open the collection at `path`. The path is remembered only if the open succeeds.
    pub fn open(&self, path: impl Into<String>) -> Result<()> {
        let path = path.into();
        let opened = self.guard.run(|gateway| {
            if let Some(bytes) = self.config.page_size_bytes {
                gateway.set_page_size(bytes)?;
            }
            gateway.open_collection(&path)
        });
        let mut current = self.path.lock();
        match opened {
            Ok(()) => {
                info!("opened collection {}", path);
                *current = Some(path);
                Ok(())
            }
            Err(err) => {
                *current = None;
                Err(err)
            }
        }
    }

    /// Close the open collection, discarding any outstanding cursor state
    pub fn close(&self) -> Result<()> {
        let closed = self.guard.run(|gateway| {
            gateway.cancel_all_queries()?;
            gateway.close_collection()
        });
        if let Some(path) = self.path.lock().take() {
            debug!("closed collection {}", path);
        }
        closed
    }

    /// Tear down the engine instance. Every later call fails with `BackendClosed`.
    pub fn close_backend(&self) -> Result<()> {
        self.guard.run(|gateway| {
            gateway.close();
            Ok(())
        })?;
        *self.path.lock() = None;
        Ok(())
    }

    pub fn is_open(&self) -> bool { self.path.lock().is_some() }

    pub fn path(&self) -> Option<String> { self.path.lock().clone() }

    pub fn is_read_only(&self) -> bool { self.config.read_only }

    pub fn begin_transaction(&self) -> Result<()> { self.guard.begin_transaction() }

    pub fn set_transaction_successful(&self) -> Result<()> { self.guard.set_transaction_successful() }

    pub fn end_transaction(&self) -> Result<()> { self.guard.end_transaction() }

    pub fn in_transaction(&self) -> bool { self.guard.in_transaction() }

    /// Begin a transaction level owned by the returned token
    pub fn transaction(&self) -> Result<Transaction> { self.guard.begin() }

    pub fn query(&self, sql: &str, args: &[SqlValue]) -> Result<StreamingCursor> { StreamingCursor::new(self.guard.clone(), sql, args) }

    /// Run `sql` and materialize its whole result
    pub fn query_in_memory(&self, sql: &str, args: &[SqlValue]) -> Result<MemoryCursor> {
        self.guard
            .run(|gateway| {
                let rows = gateway.query_rows(sql, args, false)?;
                let columns = gateway.column_names(sql)?;
                Ok(MemoryCursor::new(columns, rows))
            })
            .map_err(|e| e.remap(sql))
    }

    pub fn exec_sql(&self, sql: &str, args: &[SqlValue]) -> Result<()> { self.query(sql, args)?.close() }

    /// Run a write statement, returning the number of rows it changed
    pub fn execute_update_delete(&self, sql: &str, args: &[SqlValue]) -> Result<i64> {
        self.guard.run(|gateway| gateway.execute_for_row_count(sql, args)).map_err(|e| e.remap(sql))
    }

    /// Run an insert statement, returning the new row id
    pub fn insert_for_id(&self, sql: &str, args: &[SqlValue]) -> Result<i64> {
        self.guard.run(|gateway| gateway.insert_for_id(sql, args)).map_err(|e| e.remap(sql))
    }

    pub fn insert(&self, table: &str, conflict: Conflict, values: &[(&str, SqlValue)]) -> Result<i64> {
        let mut sql = format!("INSERT{} INTO {}(", conflict.clause(), table);
        if values.is_empty() {
            sql.push_str("NULL) VALUES (NULL)");
        } else {
            let columns: Vec<&str> = values.iter().map(|(column, _)| *column).collect();
            sql.push_str(&columns.join(","));
            sql.push_str(") VALUES (");
            sql.push_str(&vec!["?"; values.len()].join(","));
            sql.push(')');
        }
        let args: Vec<SqlValue> = values.iter().map(|(_, value)| value.clone()).collect();
        self.insert_for_id(&sql, &args)
    }

    pub fn update(&self, table: &str, conflict: Conflict, values: &[(&str, SqlValue)], where_clause: Option<&str>, where_args: &[SqlValue]) -> Result<i64> {
        if values.is_empty() {
            return Err(Error::InvalidArgument("Empty values".into()));
        }
        let assignments: Vec<String> = values.iter().map(|(column, _)| format!("{}=?", column)).collect();
        let mut sql = format!("UPDATE {}{} SET {}", conflict.clause(), table, assignments.join(","));
        if let Some(clause) = where_clause.filter(|c| !c.is_empty()) {
            sql.push_str(" WHERE ");
            sql.push_str(clause);
        }
        let args: Vec<SqlValue> = values.iter().map(|(_, value)| value.clone()).chain(where_args.iter().cloned()).collect();
        self.execute_update_delete(&sql, &args)
    }

    pub fn compile_statement(&self, sql: impl Into<String>) -> Statement<'_> { Statement::new(self, sql) }

    pub fn column_names(&self, sql: &str) -> Result<Vec<String>> { self.guard.run(|gateway| gateway.column_names(sql)).map_err(|e| e.remap(sql)) }

    pub fn is_database_integrity_ok(&self) -> Result<bool> {
        let mut cursor = self.query("pragma integrity_check", &[])?;
        if !cursor.move_to_first()? {
            return Ok(false);
        }
        Ok(cursor.get_string(0)? == "ok")
    }

    pub fn set_page_size(&self, bytes: u64) -> Result<()> { self.guard.run(|gateway| gateway.set_page_size(bytes)) }

    pub fn delete(&self, _table: &str, _where_clause: Option<&str>, _where_args: &[SqlValue]) -> Result<i64> { Err(Error::NotImplemented("delete")) }

    pub fn version(&self) -> Result<i32> { Err(Error::NotImplemented("version")) }

    pub fn set_version(&self, _version: i32) -> Result<()> { Err(Error::NotImplemented("set_version")) }

    pub fn needs_upgrade(&self, _version: i32) -> Result<bool> { Err(Error::NotImplemented("needs_upgrade")) }

    pub fn set_locale(&self, _locale: &str) -> Result<()> { Err(Error::NotImplemented("set_locale")) }

    pub fn set_maximum_size(&self, _bytes: u64) -> Result<u64> { Err(Error::NotImplemented("set_maximum_size")) }

    pub fn enable_write_ahead_logging(&self) -> Result<bool> { Err(Error::NotImplemented("enable_write_ahead_logging")) }
}
