//! Result paging for streaming queries.
//!
//! A backend keeps the rows of at most one streaming query. Starting another
//! streaming query replaces them, and later page requests are served from the
//! replacement under its own sequence number.

use std::sync::atomic::{AtomicI32, Ordering};

use cursorbridge_proto::{DbSlice, Row, SequenceNumber};

static NEXT_SEQUENCE_NUMBER: AtomicI32 = AtomicI32::new(1);

/// Allocate a sequence number, unique within the process
pub(crate) fn next_sequence_number() -> SequenceNumber { SequenceNumber(NEXT_SEQUENCE_NUMBER.fetch_add(1, Ordering::Relaxed)) }

pub(crate) struct PageCache {
    pub sequence_number: SequenceNumber,
    pub rows: Vec<Row>,
}

impl PageCache {
    pub fn new(sequence_number: SequenceNumber, rows: Vec<Row>) -> Self { Self { sequence_number, rows } }

    pub fn slice(&self, start_index: i64, page_size: u64) -> DbSlice {
        let start_index = start_index.max(0);
        DbSlice {
            sequence_number: self.sequence_number,
            start_index,
            row_count: self.rows.len() as i64,
            rows: take_page(&self.rows, start_index, page_size),
        }
    }
}

/// Rows from `start_index` while their estimated size fits in `page_size`.
/// A non-empty page always holds at least one row.
pub(crate) fn take_page(rows: &[Row], start_index: i64, page_size: u64) -> Vec<Row> {
    let start = usize::try_from(start_index).unwrap_or(0).min(rows.len());
    let mut used: u64 = 0;
    let mut page = Vec::new();
    for row in &rows[start..] {
        let size = row.estimated_size() as u64;
        if !page.is_empty() && used.saturating_add(size) > page_size {
            break;
        }
        used += size;
        page.push(row.clone());
    }
    page
}
