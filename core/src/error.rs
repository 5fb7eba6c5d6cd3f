//! Errors surfaced to callers of the shim.
//!
//! Engine failures arrive as [`BackendError`] envelopes. Anything that passes
//! through the relational adapter is remapped onto the platform's SQLite
//! exception taxonomy by [`Error::remap`].

use cursorbridge_proto::{BackendError, BackendErrorKind, CodecError, SequenceNumber};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// The platform exception class a failure corresponds to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqliteErrorKind {
    Constraint,
    Full,
    Corrupt,
    Locked,
    BindArgument,
    /// A single-value query produced no row
    Done,
    Generic,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind:?}: {message}")]
pub struct SqliteFailure {
    pub kind: SqliteErrorKind,
    pub message: String,
    /// Extended result code reported by SQLite, when the engine message carries one
    pub code: Option<i32>,
}

impl SqliteFailure {
    pub fn new(kind: SqliteErrorKind, message: impl Into<String>, code: Option<i32>) -> Self { Self { kind, message: message.into(), code } }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("no collection is open")]
    NotOpen,
    #[error("a collection is already open")]
    AlreadyOpen,
    #[error("backend has been closed")]
    BackendClosed,
    #[error("not in a transaction")]
    NotInTransaction,
    #[error("{0}")]
    Sqlite(SqliteFailure),
    #[error("backend error: {0}")]
    Backend(BackendError),
    #[error("nested cursor-based queries are not supported: cursor {expected} received a page of query {actual}")]
    InterleavedCursor { expected: SequenceNumber, actual: SequenceNumber },
    #[error("nested cursor-based queries are not supported: query {0} was released by another query")]
    QueryReleased(SequenceNumber),
    #[error("cursor is closed")]
    CursorClosed,
    #[error("Index {index} requested, with a size of {size}")]
    CursorIndexOutOfBounds { index: i64, size: i64 },
    #[error("column '{0}' does not exist")]
    ColumnNotFound(String),
    #[error("unexpected response: expected {expected}, got {actual}")]
    UnexpectedResponse { expected: &'static str, actual: &'static str },
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("failed to load engine library: {0}")]
    Library(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),
}

impl From<BackendError> for Error {
    fn from(err: BackendError) -> Self {
        match err.kind {
            BackendErrorKind::CollectionNotOpen => Error::NotOpen,
            BackendErrorKind::CollectionAlreadyOpen => Error::AlreadyOpen,
            _ => Error::Backend(err),
        }
    }
}

impl From<SqliteFailure> for Error {
    fn from(failure: SqliteFailure) -> Self { Error::Sqlite(failure) }
}

impl Error {
    pub(crate) fn generic(message: impl Into<String>) -> Self { Error::Sqlite(SqliteFailure::new(SqliteErrorKind::Generic, message, None)) }

    /// Kind of the SQLite failure, if this is one
    pub fn sqlite_kind(&self) -> Option<SqliteErrorKind> {
        match self {
            Error::Sqlite(failure) => Some(failure.kind),
            _ => None,
        }
    }

    /// Rewrite an engine envelope as a platform failure for the statement `sql`.
    /// Every other error passes through untouched.
    pub fn remap(self, sql: &str) -> Self {
        match self {
            Error::Backend(envelope) => Error::Sqlite(remap_envelope(&envelope, sql)),
            other => other,
        }
    }
}

const COMPILE_FAILURES: &[(&[&str], SqliteErrorKind, bool)] = &[
    (&["ConstraintViolation"], SqliteErrorKind::Constraint, false),
    (&["DiskFull"], SqliteErrorKind::Full, false),
    (&["DatabaseCorrupt", "NotADatabase"], SqliteErrorKind::Corrupt, true),
    (&["DatabaseBusy", "DatabaseLocked", "already open"], SqliteErrorKind::Locked, true),
];

fn remap_envelope(envelope: &BackendError, sql: &str) -> SqliteFailure {
    let message = envelope.message.as_str();
    let code = extended_code(message);

    if let Some((index, count)) = invalid_parameter_count(message) {
        return SqliteFailure::new(
            SqliteErrorKind::BindArgument,
            format!("Cannot bind argument at index {} because the index is out of range.  The statement has {} parameters.", index, count),
            code,
        );
    }

    if envelope.kind == BackendErrorKind::DbError {
        for (needles, kind, with_sql) in COMPILE_FAILURES {
            if needles.iter().any(|needle| message.contains(needle)) {
                let message = if *with_sql { compiling(sql, message) } else { message.to_owned() };
                return SqliteFailure::new(*kind, message, code);
            }
        }
    }

    SqliteFailure::new(SqliteErrorKind::Generic, compiling(sql, message), code)
}

fn compiling(sql: &str, message: &str) -> String { format!("error while compiling: \"{}\": {}", sql, message) }

/// `InvalidParameterCount(3, 2)` → `(3, 2)`
fn invalid_parameter_count(message: &str) -> Option<(i64, i64)> {
    let rest = &message[message.find("InvalidParameterCount(")? + "InvalidParameterCount(".len()..];
    let inner = &rest[..rest.find(')')?];
    let (index, count) = inner.split_once(',')?;
    Some((index.trim().parse().ok()?, count.trim().parse().ok()?))
}

/// `... extended_code: 2067 ...` → `2067`
fn extended_code(message: &str) -> Option<i32> {
    let rest = &message[message.find("extended_code: ")? + "extended_code: ".len()..];
    let end = rest.find(|c: char| !c.is_ascii_digit() && c != '-').unwrap_or(rest.len());
    rest[..end].parse().ok()
}
