//! Request/response round trips to one engine instance.

use std::sync::Arc;

use cursorbridge_proto::{decode, encode, BackendError, DbRequest, DbResponse, DbSlice, Row, SequenceNumber, SqlValue};
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::{
    engine::{Engine, EngineHandle},
    error::{Error, Result},
    session::TransactionBackend,
};

enum HandleState {
    Unopened,
    Open(EngineHandle),
    Closed,
}

/// Owns the engine handle and performs one synchronous call per request.
///
/// The handle is opened lazily on the first request and closed exactly once.
/// The gateway knows nothing about transactions or cursors; callers serialize
/// access through a `ConcurrencyGuard`.
pub struct Gateway {
    engine: Arc<dyn Engine>,
    handle: Mutex<HandleState>,
}

macro_rules! expect_response {
    ($response:expr, $pattern:pat => $value:expr, $expected:literal) => {
        match $response {
            $pattern => Ok($value),
            other => Err(Error::UnexpectedResponse { expected: $expected, actual: other.kind() }),
        }
    };
}

impl Gateway {
    pub fn new(engine: Arc<dyn Engine>) -> Self { Self { engine, handle: Mutex::new(HandleState::Unopened) } }

    pub fn is_closed(&self) -> bool { matches!(*self.handle.lock(), HandleState::Closed) }

    /// Send one request and wait for its response.
    pub fn request(&self, request: &DbRequest) -> Result<DbResponse> {
        let bytes = encode(request)?;
        let mut state = self.handle.lock();
        let handle = match *state {
            HandleState::Open(handle) => handle,
            HandleState::Closed => return Err(Error::BackendClosed),
            HandleState::Unopened => {
                self.engine.load().map_err(Error::Library)?;
                let handle = self.engine.open().map_err(|envelope| envelope_error(&envelope))?;
                debug!("opened {}", handle);
                *state = HandleState::Open(handle);
                handle
            }
        };
        trace!("{} <- {}", handle, request);
        match self.engine.run(handle, &bytes) {
            Ok(response) => Ok(decode(&response)?),
            Err(envelope) => Err(envelope_error(&envelope)),
        }
    }

    /// Tear down the engine instance. Later requests fail with `BackendClosed`.
    pub fn close(&self) {
        let mut state = self.handle.lock();
        if let HandleState::Open(handle) = std::mem::replace(&mut *state, HandleState::Closed) {
            debug!("closing {}", handle);
            self.engine.close(handle);
        }
    }

    fn expect_empty(&self, request: DbRequest) -> Result<()> { expect_response!(self.request(&request)?, DbResponse::Empty => (), "Empty") }

    pub fn open_collection(&self, path: &str) -> Result<()> { self.expect_empty(DbRequest::OpenCollection { path: path.to_owned() }) }

    pub fn close_collection(&self) -> Result<()> { self.expect_empty(DbRequest::CloseCollection) }

    pub fn begin(&self) -> Result<()> { self.expect_empty(DbRequest::Begin) }

    pub fn commit(&self) -> Result<()> { self.expect_empty(DbRequest::Commit) }

    pub fn rollback(&self) -> Result<()> { self.expect_empty(DbRequest::Rollback) }

    pub fn query_rows(&self, sql: &str, args: &[SqlValue], first_row_only: bool) -> Result<Vec<Row>> {
        let request = DbRequest::Query { sql: sql.to_owned(), args: args.to_vec(), first_row_only };
        expect_response!(self.request(&request)?, DbResponse::Rows(rows) => rows, "Rows")
    }

    pub fn streaming_query(&self, sql: &str, args: &[SqlValue]) -> Result<DbSlice> {
        let request = DbRequest::StreamingQuery { sql: sql.to_owned(), args: args.to_vec() };
        expect_response!(self.request(&request)?, DbResponse::Slice(slice) => slice, "Slice")
    }

    pub fn next_slice(&self, sequence_number: SequenceNumber, start_index: i64) -> Result<DbSlice> {
        let request = DbRequest::NextSlice { sequence_number, start_index };
        expect_response!(self.request(&request)?, DbResponse::Slice(slice) => slice, "Slice")
    }

    pub fn cancel_query(&self, sequence_number: SequenceNumber) -> Result<()> { self.expect_empty(DbRequest::CancelQuery { sequence_number }) }

    pub fn cancel_all_queries(&self) -> Result<()> { self.expect_empty(DbRequest::CancelAllQueries) }

    pub fn column_names(&self, sql: &str) -> Result<Vec<String>> {
        let request = DbRequest::ColumnNames { sql: sql.to_owned() };
        expect_response!(self.request(&request)?, DbResponse::ColumnNames(names) => names, "ColumnNames")
    }

    pub fn execute_for_row_count(&self, sql: &str, args: &[SqlValue]) -> Result<i64> {
        let request = DbRequest::ExecuteForRowCount { sql: sql.to_owned(), args: args.to_vec() };
        expect_response!(self.request(&request)?, DbResponse::RowCount(count) => count, "RowCount")
    }

    pub fn insert_for_id(&self, sql: &str, args: &[SqlValue]) -> Result<i64> {
        let request = DbRequest::InsertForId { sql: sql.to_owned(), args: args.to_vec() };
        expect_response!(self.request(&request)?, DbResponse::InsertId(id) => id, "InsertId")
    }

    pub fn set_page_size(&self, bytes: u64) -> Result<()> { self.expect_empty(DbRequest::SetPageSize { bytes }) }
}

impl TransactionBackend for Gateway {
    fn begin_transaction(&self) -> Result<()> {
        debug!("physical begin");
        self.begin()
    }

    fn commit_transaction(&self) -> Result<()> {
        debug!("physical commit");
        self.commit()
    }

    fn rollback_transaction(&self) -> Result<()> {
        debug!("physical rollback");
        self.rollback()
    }
}

fn envelope_error(envelope: &[u8]) -> Error {
    match decode::<BackendError>(envelope) {
        Ok(err) => err.into(),
        Err(err) => err.into(),
    }
}
