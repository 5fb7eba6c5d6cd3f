use std::cell::OnceCell;

use cursorbridge_proto::{BackendErrorKind, DbSlice, SequenceNumber, SqlValue};
use tracing::{debug, trace, warn};

use super::{field_at, Cursor};
use crate::{
    error::{Error, Result},
    guard::ConcurrencyGuard,
};

/// A cursor that pages through a query result one bounded slice at a time.
///
/// The engine keeps a single paging cache per connection. Running a second
/// streaming query while this one is still being read replaces that cache,
/// which this cursor detects as an [`Error::InterleavedCursor`] on its next
/// page load. If that query has already been closed, the next page load fails
/// with [`Error::QueryReleased`].
pub struct StreamingCursor {
    guard: ConcurrencyGuard,
    sql: String,
    sequence_number: SequenceNumber,
    row_count: i64,
    slice: DbSlice,
    /// Offset of the current row within `slice`; may point outside it
    offset: i64,
    column_names: OnceCell<Vec<String>>,
    closed: bool,
}

impl std::fmt::Debug for StreamingCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingCursor")
            .field("sql", &self.sql)
            .field("row_count", &self.row_count)
            .field("offset", &self.offset)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl StreamingCursor {
    /// Run `sql` and hold its first slice. The cursor starts before the first row.
    pub fn new(guard: ConcurrencyGuard, sql: impl Into<String>, args: &[SqlValue]) -> Result<Self> {
        let sql = sql.into();
        let slice = guard.run(|gateway| gateway.streaming_query(&sql, args)).map_err(|e| e.remap(&sql))?;
        debug!("cursor {} opened: {}", slice.sequence_number, slice);
        Ok(Self {
            guard,
            sql,
            sequence_number: slice.sequence_number,
            row_count: slice.row_count,
            slice,
            offset: -1,
            column_names: OnceCell::new(),
            closed: false,
        })
    }

    pub fn sequence_number(&self) -> SequenceNumber { self.sequence_number }

    pub fn sql(&self) -> &str { &self.sql }

    /// Global index of the first row of the current slice
    pub fn slice_start(&self) -> i64 { self.slice.start_index }

    pub fn slice_len(&self) -> usize { self.slice.len() }

    fn ensure_open(&self) -> Result<()> {
        match self.closed {
            true => Err(Error::CursorClosed),
            false => Ok(()),
        }
    }

    fn load_slice(&mut self, start_index: i64) -> Result<()> {
        let sequence_number = self.sequence_number;
        let slice = self.guard.run(|gateway| gateway.next_slice(sequence_number, start_index)).map_err(|err| match err {
            // another streaming query ran to completion and released the engine's cache
            Error::Backend(envelope) if envelope.kind == BackendErrorKind::InvalidInput => Error::QueryReleased(sequence_number),
            other => other.remap(&self.sql),
        })?;
        if slice.sequence_number != sequence_number {
            return Err(Error::InterleavedCursor { expected: sequence_number, actual: slice.sequence_number });
        }
        trace!("cursor {} loaded {}", sequence_number, slice);
        self.slice = slice;
        Ok(())
    }

    fn on_row(&self) -> bool { (0..self.slice.len() as i64).contains(&self.offset) }
}

impl Cursor for StreamingCursor {
    fn count(&self) -> Result<i64> {
        self.ensure_open()?;
        Ok(self.row_count)
    }

    fn position(&self) -> i64 { self.slice.start_index.saturating_add(self.offset) }

    fn move_to_position(&mut self, position: i64) -> Result<bool> {
        self.ensure_open()?;
        let local = position.saturating_sub(self.slice.start_index);
        let slice_len = self.slice.len() as i64;
        let paged = self.row_count != slice_len;

        if (0..slice_len).contains(&local) {
            self.offset = local;
        } else if paged && (0..self.row_count).contains(&position) {
            self.load_slice(position)?;
            self.offset = position.saturating_sub(self.slice.start_index);
        } else if paged && position < 0 && self.slice.start_index != 0 {
            self.load_slice(0)?;
            self.offset = position.saturating_sub(self.slice.start_index);
        } else {
            self.offset = local;
        }
        Ok(self.on_row())
    }

    fn field(&self, column: usize) -> Result<&SqlValue> {
        self.ensure_open()?;
        field_at(&self.slice.rows, self.offset, column)
    }

    fn column_count(&self) -> Result<usize> {
        self.ensure_open()?;
        Ok(self.slice.rows.first().map(|row| row.fields.len()).unwrap_or(0))
    }

    fn column_names(&self) -> Result<&[String]> {
        self.ensure_open()?;
        if let Some(names) = self.column_names.get() {
            return Ok(names);
        }
        let names = self.guard.run(|gateway| gateway.column_names(&self.sql)).map_err(|e| e.remap(&self.sql))?;
        Ok(self.column_names.get_or_init(|| names))
    }

    /// Release the engine's paging state. Safe to call more than once.
    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let sequence_number = self.sequence_number;
        match self.guard.run(|gateway| gateway.cancel_query(sequence_number)) {
            Ok(()) | Err(Error::BackendClosed) => {
                debug!("cursor {} closed", sequence_number);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    fn is_closed(&self) -> bool { self.closed }
}

impl Drop for StreamingCursor {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!("failed to release cursor {}: {}", self.sequence_number, err);
        }
    }
}
