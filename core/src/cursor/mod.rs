//! Platform-shaped cursors over query results.
//!
//! A [`Cursor`] exposes one row at a time through a global position that
//! starts at -1 (before the first row). Field accessors apply SQLite's
//! conversion rules between storage classes.

mod memory;
mod streaming;

pub use memory::MemoryCursor;
pub use streaming::StreamingCursor;

use cursorbridge_proto::{FieldType, SqlValue};

use crate::{
    convert::{strtod, strtol},
    error::{Error, Result},
};

pub trait Cursor {
    /// Total number of rows in the result
    fn count(&self) -> Result<i64>;

    fn position(&self) -> i64;

    /// Move to an absolute row. Returns whether the cursor now rests on a row.
    fn move_to_position(&mut self, position: i64) -> Result<bool>;

    /// The field at `column` of the current row
    fn field(&self, column: usize) -> Result<&SqlValue>;

    fn column_count(&self) -> Result<usize>;

    fn column_names(&self) -> Result<&[String]>;

    fn close(&mut self) -> Result<()>;

    fn is_closed(&self) -> bool;

    fn move_to_first(&mut self) -> Result<bool> { self.move_to_position(0) }

    fn move_to_last(&mut self) -> Result<bool> {
        let count = self.count()?;
        self.move_to_position(count - 1)
    }

    fn move_to_next(&mut self) -> Result<bool> { self.move_by(1) }

    fn move_to_previous(&mut self) -> Result<bool> { self.move_by(-1) }

    fn move_by(&mut self, offset: i64) -> Result<bool> {
        let target = self.position().saturating_add(offset);
        self.move_to_position(target)
    }

    fn is_first(&self) -> Result<bool> { Ok(self.count()? != 0 && self.position() == 0) }

    fn is_last(&self) -> Result<bool> {
        let count = self.count()?;
        Ok(count != 0 && self.position() == count - 1)
    }

    fn is_before_first(&self) -> Result<bool> { Ok(self.count()? == 0 || self.position() == -1) }

    fn is_after_last(&self) -> Result<bool> {
        let count = self.count()?;
        Ok(count == 0 || self.position() == count)
    }

    fn get_type(&self, column: usize) -> Result<FieldType> { Ok(self.field(column)?.field_type()) }

    fn is_null(&self, column: usize) -> Result<bool> { Ok(self.field(column)?.is_null()) }

    /// NULL reads as an empty string
    fn get_string(&self, column: usize) -> Result<String> {
        match self.field(column)? {
            SqlValue::Null => Ok(String::new()),
            SqlValue::Integer(i) => Ok(i.to_string()),
            SqlValue::Double(d) => Ok(format!("{:?}", d)),
            SqlValue::Text(s) => Ok(s.clone()),
            SqlValue::Blob(_) => Err(unconvertible("BLOB", "string")),
        }
    }

    fn get_long(&self, column: usize) -> Result<i64> {
        match self.field(column)? {
            SqlValue::Null => Ok(0),
            SqlValue::Integer(i) => Ok(*i),
            SqlValue::Double(d) => Ok(*d as i64),
            SqlValue::Text(s) => Ok(strtol(s)),
            SqlValue::Blob(_) => Err(unconvertible("BLOB", "long")),
        }
    }

    fn get_int(&self, column: usize) -> Result<i32> { Ok(self.get_long(column)? as i32) }

    fn get_short(&self, column: usize) -> Result<i16> { Ok(self.get_long(column)? as i16) }

    fn get_double(&self, column: usize) -> Result<f64> {
        match self.field(column)? {
            SqlValue::Null => Ok(0.0),
            SqlValue::Integer(i) => Ok(*i as f64),
            SqlValue::Double(d) => Ok(*d),
            SqlValue::Text(s) => Ok(strtod(s)),
            SqlValue::Blob(_) => Err(unconvertible("BLOB", "double")),
        }
    }

    fn get_float(&self, column: usize) -> Result<f32> { Ok(self.get_double(column)? as f32) }

    /// NULL reads as an empty blob, text as its UTF-8 bytes
    fn get_blob(&self, column: usize) -> Result<Vec<u8>> {
        match self.field(column)? {
            SqlValue::Null => Ok(Vec::new()),
            SqlValue::Integer(_) => Err(unconvertible("INTEGER", "blob")),
            SqlValue::Double(_) => Err(unconvertible("FLOAT", "blob")),
            SqlValue::Text(s) => Ok(s.as_bytes().to_vec()),
            SqlValue::Blob(b) => Ok(b.clone()),
        }
    }

    fn column_name(&self, column: usize) -> Result<String> {
        let names = self.column_names()?;
        names.get(column).cloned().ok_or(Error::CursorIndexOutOfBounds { index: column as i64, size: names.len() as i64 })
    }

    fn column_index(&self, name: &str) -> Option<usize> { self.column_names().ok()?.iter().position(|c| c == name) }

    fn column_index_or_throw(&self, name: &str) -> Result<usize> {
        self.column_names()?.iter().position(|c| c == name).ok_or_else(|| Error::ColumnNotFound(name.to_owned()))
    }
}

fn unconvertible(from: &str, to: &str) -> Error { Error::generic(format!("unknown error (code 0): Unable to convert {} to {}", from, to)) }

/// Look up `column` of the row at `offset`, reporting the platform's index errors
pub(crate) fn field_at<'a>(rows: &'a [cursorbridge_proto::Row], offset: i64, column: usize) -> Result<&'a SqlValue> {
    let row = usize::try_from(offset)
        .ok()
        .and_then(|offset| rows.get(offset))
        .ok_or(Error::CursorIndexOutOfBounds { index: offset, size: rows.len() as i64 })?;
    row.fields.get(column).ok_or(Error::CursorIndexOutOfBounds { index: column as i64, size: row.fields.len() as i64 })
}
