use serde::{Deserialize, Serialize};

use crate::value::SqlValue;

/// Identifies one streaming query on the engine side.
///
/// All pages of a query, and its cancellation, carry the number the engine
/// assigned when the query began.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
pub struct SequenceNumber(pub i32);

impl std::fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "#{}", self.0) }
}

/// A single request sent across the engine boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DbRequest {
    OpenCollection { path: String },
    CloseCollection,
    Begin,
    Commit,
    Rollback,
    /// Run a statement and return every row at once
    Query { sql: String, args: Vec<SqlValue>, first_row_only: bool },
    /// Run a statement and return the first page of its rows
    StreamingQuery { sql: String, args: Vec<SqlValue> },
    NextSlice { sequence_number: SequenceNumber, start_index: i64 },
    CancelQuery { sequence_number: SequenceNumber },
    CancelAllQueries,
    ColumnNames { sql: String },
    ExecuteForRowCount { sql: String, args: Vec<SqlValue> },
    InsertForId { sql: String, args: Vec<SqlValue> },
    SetPageSize { bytes: u64 },
}

impl DbRequest {
    /// The statement text carried by this request, if any
    pub fn sql(&self) -> Option<&str> {
        match self {
            DbRequest::Query { sql, .. }
            | DbRequest::StreamingQuery { sql, .. }
            | DbRequest::ColumnNames { sql }
            | DbRequest::ExecuteForRowCount { sql, .. }
            | DbRequest::InsertForId { sql, .. } => Some(sql),
            _ => None,
        }
    }
}

impl std::fmt::Display for DbRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbRequest::OpenCollection { path } => write!(f, "OpenCollection({})", path),
            DbRequest::CloseCollection => write!(f, "CloseCollection"),
            DbRequest::Begin => write!(f, "Begin"),
            DbRequest::Commit => write!(f, "Commit"),
            DbRequest::Rollback => write!(f, "Rollback"),
            DbRequest::Query { sql, args, first_row_only } => {
                write!(f, "Query({} args {}{})", sql, args.len(), if *first_row_only { " first row" } else { "" })
            }
            DbRequest::StreamingQuery { sql, args } => write!(f, "StreamingQuery({} args {})", sql, args.len()),
            DbRequest::NextSlice { sequence_number, start_index } => write!(f, "NextSlice({} from {})", sequence_number, start_index),
            DbRequest::CancelQuery { sequence_number } => write!(f, "CancelQuery({})", sequence_number),
            DbRequest::CancelAllQueries => write!(f, "CancelAllQueries"),
            DbRequest::ColumnNames { sql } => write!(f, "ColumnNames({})", sql),
            DbRequest::ExecuteForRowCount { sql, args } => write!(f, "ExecuteForRowCount({} args {})", sql, args.len()),
            DbRequest::InsertForId { sql, args } => write!(f, "InsertForId({} args {})", sql, args.len()),
            DbRequest::SetPageSize { bytes } => write!(f, "SetPageSize({})", bytes),
        }
    }
}
