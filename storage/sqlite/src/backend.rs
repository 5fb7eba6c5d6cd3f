//! One engine instance: an optional open collection plus its paging state.

use cursorbridge_proto::{DbRequest, DbResponse, Row, SqlValue};
use rusqlite::{params_from_iter, Connection};
use tracing::{debug, trace};

use crate::{
    connection::{open_connection, SqliteConfig, SqliteEngineConfig},
    error::SqliteEngineError,
    paging::{next_sequence_number, PageCache},
    value::{from_sql, to_sql},
};

struct Collection {
    conn: Connection,
    path: String,
}

pub(crate) struct Backend {
    collection: Option<Collection>,
    cache: Option<PageCache>,
    page_size: u64,
    pragmas: String,
}

impl Backend {
    pub fn new(config: &SqliteEngineConfig) -> Self { Self { collection: None, cache: None, page_size: config.page_size_bytes, pragmas: config.pragmas.clone() } }

    fn conn(&self) -> Result<&Connection, SqliteEngineError> { self.collection.as_ref().map(|c| &c.conn).ok_or(SqliteEngineError::CollectionNotOpen) }

    pub fn handle(&mut self, request: DbRequest) -> Result<DbResponse, SqliteEngineError> {
        trace!("handling {}", request);
        match request {
            DbRequest::OpenCollection { path } => {
                if let Some(open) = &self.collection {
                    return Err(SqliteEngineError::CollectionAlreadyOpen(open.path.clone()));
                }
                let conn = open_connection(&SqliteConfig::from_path(&path), &self.pragmas)?;
                debug!("opened collection {}", path);
                self.collection = Some(Collection { conn, path });
                Ok(DbResponse::Empty)
            }
            DbRequest::CloseCollection => {
                let collection = self.collection.take().ok_or(SqliteEngineError::CollectionNotOpen)?;
                self.cache = None;
                debug!("closing collection {}", collection.path);
                collection.conn.close().map_err(|(_, e)| e)?;
                Ok(DbResponse::Empty)
            }
            DbRequest::Begin => self.execute_batch("begin"),
            DbRequest::Commit => self.execute_batch("commit"),
            DbRequest::Rollback => self.execute_batch("rollback"),
            DbRequest::Query { sql, args, first_row_only } => {
                let limit = if first_row_only { Some(1) } else { None };
                Ok(DbResponse::Rows(query(self.conn()?, &sql, &args, limit)?))
            }
            DbRequest::StreamingQuery { sql, args } => {
                let rows = query(self.conn()?, &sql, &args, None)?;
                let cache = PageCache::new(next_sequence_number(), rows);
                let slice = cache.slice(0, self.page_size);
                debug!("streaming query {}: {}", cache.sequence_number, slice);
                self.cache = Some(cache);
                Ok(DbResponse::Slice(slice))
            }
            DbRequest::NextSlice { sequence_number, start_index } => {
                let cache = self.cache.as_ref().ok_or(SqliteEngineError::NoActiveQuery)?;
                if cache.sequence_number != sequence_number {
                    debug!("page of {} requested, serving {}", sequence_number, cache.sequence_number);
                }
                Ok(DbResponse::Slice(cache.slice(start_index, self.page_size)))
            }
            DbRequest::CancelQuery { sequence_number } => {
                if self.cache.as_ref().is_some_and(|cache| cache.sequence_number == sequence_number) {
                    trace!("released {}", sequence_number);
                    self.cache = None;
                }
                Ok(DbResponse::Empty)
            }
            DbRequest::CancelAllQueries => {
                self.cache = None;
                Ok(DbResponse::Empty)
            }
            DbRequest::ColumnNames { sql } => {
                let stmt = self.conn()?.prepare(&sql)?;
                Ok(DbResponse::ColumnNames(stmt.column_names().into_iter().map(str::to_owned).collect()))
            }
            DbRequest::ExecuteForRowCount { sql, args } => {
                let changed = self.conn()?.prepare(&sql)?.execute(params_from_iter(args.iter().map(to_sql)))?;
                Ok(DbResponse::RowCount(changed as i64))
            }
            DbRequest::InsertForId { sql, args } => {
                let conn = self.conn()?;
                conn.prepare(&sql)?.execute(params_from_iter(args.iter().map(to_sql)))?;
                Ok(DbResponse::InsertId(conn.last_insert_rowid()))
            }
            DbRequest::SetPageSize { bytes } => {
                self.page_size = bytes;
                Ok(DbResponse::Empty)
            }
        }
    }

    fn execute_batch(&self, sql: &str) -> Result<DbResponse, SqliteEngineError> {
        self.conn()?.execute_batch(sql)?;
        Ok(DbResponse::Empty)
    }
}

/// Run a statement to completion and collect its rows
fn query(conn: &Connection, sql: &str, args: &[SqlValue], limit: Option<usize>) -> Result<Vec<Row>, SqliteEngineError> {
    let mut stmt = conn.prepare(sql)?;
    let columns = stmt.column_count();
    let mut rows = stmt.query(params_from_iter(args.iter().map(to_sql)))?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let fields = (0..columns).map(|i| row.get_ref(i).map(from_sql)).collect::<Result<Vec<_>, _>>()?;
        out.push(Row::new(fields));
        if limit.is_some_and(|limit| out.len() >= limit) {
            break;
        }
    }
    Ok(out)
}
