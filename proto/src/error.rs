use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broad category of an engine failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendErrorKind {
    DbError,
    InvalidInput,
    CollectionNotOpen,
    CollectionAlreadyOpen,
    Interrupted,
    ProtoError,
    FatalError,
}

/// The error envelope returned by the engine in place of a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("{kind:?}: {message}")]
pub struct BackendError {
    pub kind: BackendErrorKind,
    pub message: String,
}

impl BackendError {
    pub fn new(kind: BackendErrorKind, message: impl Into<String>) -> Self { Self { kind, message: message.into() } }

    pub fn db(message: impl Into<String>) -> Self { Self::new(BackendErrorKind::DbError, message) }

    pub fn invalid_input(message: impl Into<String>) -> Self { Self::new(BackendErrorKind::InvalidInput, message) }

    pub fn fatal(message: impl Into<String>) -> Self { Self::new(BackendErrorKind::FatalError, message) }
}

/// Failure to encode or decode a message crossing the engine boundary
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("encoding error: {0}")]
    Encode(bincode::Error),
    #[error("decoding error: {0}")]
    Decode(bincode::Error),
}
