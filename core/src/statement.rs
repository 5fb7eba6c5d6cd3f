use std::collections::BTreeMap;

use cursorbridge_proto::SqlValue;

use crate::{
    cursor::Cursor,
    database::Database,
    error::{Error, Result, SqliteErrorKind, SqliteFailure},
};

/// A reusable statement with positional bindings.
///
/// Bind indices start at 1. Indices left unbound below the highest bound
/// index are sent as NULL.
pub struct Statement<'a> {
    database: &'a Database,
    sql: String,
    bindings: BTreeMap<usize, SqlValue>,
}

impl<'a> Statement<'a> {
    pub(crate) fn new(database: &'a Database, sql: impl Into<String>) -> Self { Self { database, sql: sql.into(), bindings: BTreeMap::new() } }

    pub fn sql(&self) -> &str { &self.sql }

    pub fn bind(&mut self, index: usize, value: impl Into<SqlValue>) -> Result<()> {
        if index == 0 {
            return Err(SqliteFailure::new(SqliteErrorKind::BindArgument, "Cannot bind argument at index 0 because the index is out of range.", None).into());
        }
        self.bindings.insert(index, value.into());
        Ok(())
    }

    pub fn bind_null(&mut self, index: usize) -> Result<()> { self.bind(index, SqlValue::Null) }

    pub fn bind_long(&mut self, index: usize, value: i64) -> Result<()> { self.bind(index, value) }

    pub fn bind_double(&mut self, index: usize, value: f64) -> Result<()> { self.bind(index, value) }

    pub fn bind_string(&mut self, index: usize, value: &str) -> Result<()> { self.bind(index, value) }

    pub fn bind_blob(&mut self, index: usize, value: &[u8]) -> Result<()> { self.bind(index, value) }

    pub fn clear_bindings(&mut self) { self.bindings.clear(); }

    /// The bound values in positional order
    pub fn args(&self) -> Vec<SqlValue> {
        let count = self.bindings.keys().next_back().copied().unwrap_or(0);
        (1..=count).map(|index| self.bindings.get(&index).cloned().unwrap_or_default()).collect()
    }

    pub fn execute(&self) -> Result<()> { self.database.exec_sql(&self.sql, &self.args()) }

    pub fn execute_update_delete(&self) -> Result<i64> { self.database.execute_update_delete(&self.sql, &self.args()) }

    pub fn execute_insert(&self) -> Result<i64> { self.database.insert_for_id(&self.sql, &self.args()) }

    pub fn simple_query_for_long(&self) -> Result<i64> { self.first_value(|cursor| cursor.get_long(0)) }

    pub fn simple_query_for_string(&self) -> Result<String> { self.first_value(|cursor| cursor.get_string(0)) }

    fn first_value<T>(&self, read: impl FnOnce(&dyn Cursor) -> Result<T>) -> Result<T> {
        let mut cursor = self.database.query(&self.sql, &self.args())?;
        if !cursor.move_to_first()? {
            return Err(Error::Sqlite(SqliteFailure::new(SqliteErrorKind::Done, "query returned no rows", None)));
        }
        read(&cursor)
    }
}
