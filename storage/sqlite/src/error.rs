//! Error types for the SQLite engine

use cursorbridge_proto::{BackendError, BackendErrorKind, CodecError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqliteEngineError {
    #[error("SQLite error: {0}")]
    Rusqlite(#[from] rusqlite::Error),

    #[error("Protocol error: {0}")]
    Codec(#[from] CodecError),

    #[error("no collection is open")]
    CollectionNotOpen,

    #[error("collection already open: {0}")]
    CollectionAlreadyOpen(String),

    #[error("no streaming query is active")]
    NoActiveQuery,

    #[error("invalid backend handle: {0}")]
    UnknownHandle(i64),
}

impl From<&SqliteEngineError> for BackendError {
    fn from(err: &SqliteEngineError) -> Self {
        match err {
            // the debug form carries the SQLite code names callers classify on
            SqliteEngineError::Rusqlite(e) => BackendError::db(format!("{:?}", e)),
            SqliteEngineError::Codec(e) => BackendError::new(BackendErrorKind::ProtoError, e.to_string()),
            SqliteEngineError::CollectionNotOpen => BackendError::new(BackendErrorKind::CollectionNotOpen, err.to_string()),
            SqliteEngineError::CollectionAlreadyOpen(_) => BackendError::new(BackendErrorKind::CollectionAlreadyOpen, err.to_string()),
            SqliteEngineError::NoActiveQuery => BackendError::invalid_input(err.to_string()),
            SqliteEngineError::UnknownHandle(_) => BackendError::fatal(err.to_string()),
        }
    }
}
