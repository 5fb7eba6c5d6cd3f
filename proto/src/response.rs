use serde::{Deserialize, Serialize};

use crate::{request::SequenceNumber, value::SqlValue};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Row {
    pub fields: Vec<SqlValue>,
}

impl Row {
    pub fn new(fields: Vec<SqlValue>) -> Self { Self { fields } }

    pub fn estimated_size(&self) -> usize { self.fields.iter().map(SqlValue::estimated_size).sum() }
}

/// One bounded page of a streaming query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DbSlice {
    pub sequence_number: SequenceNumber,
    /// Offset of the first row of this page in the full result
    pub start_index: i64,
    /// Total number of rows of the full result
    pub row_count: i64,
    pub rows: Vec<Row>,
}

impl DbSlice {
    pub fn len(&self) -> usize { self.rows.len() }

    pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}

impl std::fmt::Display for DbSlice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Slice({} rows {}..{} of {})", self.sequence_number, self.start_index, self.start_index + self.rows.len() as i64, self.row_count)
    }
}

/// Successful payload of an engine call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DbResponse {
    Empty,
    Rows(Vec<Row>),
    Slice(DbSlice),
    ColumnNames(Vec<String>),
    RowCount(i64),
    InsertId(i64),
}

impl DbResponse {
    pub fn kind(&self) -> &'static str {
        match self {
            DbResponse::Empty => "Empty",
            DbResponse::Rows(_) => "Rows",
            DbResponse::Slice(_) => "Slice",
            DbResponse::ColumnNames(_) => "ColumnNames",
            DbResponse::RowCount(_) => "RowCount",
            DbResponse::InsertId(_) => "InsertId",
        }
    }
}
