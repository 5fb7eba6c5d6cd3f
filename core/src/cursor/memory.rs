use cursorbridge_proto::{Row, SqlValue};

use super::{field_at, Cursor};
use crate::error::{Error, Result};

/// A cursor over a fully materialized result
#[derive(Debug, Clone, Default)]
pub struct MemoryCursor {
    columns: Vec<String>,
    rows: Vec<Row>,
    position: i64,
    closed: bool,
}

impl MemoryCursor {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self { Self { columns, rows, position: -1, closed: false } }

    pub fn rows(&self) -> &[Row] { &self.rows }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::CursorClosed);
        }
        Ok(())
    }
}

impl Cursor for MemoryCursor {
    fn count(&self) -> Result<i64> {
        self.ensure_open()?;
        Ok(self.rows.len() as i64)
    }

    fn position(&self) -> i64 { self.position }

    /// Positions outside the result clamp to -1 or `count`
    fn move_to_position(&mut self, position: i64) -> Result<bool> {
        let count = self.count()?;
        self.position = position.clamp(-1, count);
        Ok((0..count).contains(&self.position))
    }

    fn field(&self, column: usize) -> Result<&SqlValue> {
        self.ensure_open()?;
        field_at(&self.rows, self.position, column)
    }

    fn column_count(&self) -> Result<usize> {
        self.ensure_open()?;
        Ok(self.columns.len())
    }

    fn column_names(&self) -> Result<&[String]> {
        self.ensure_open()?;
        Ok(&self.columns)
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }

    fn is_closed(&self) -> bool { self.closed }
}
