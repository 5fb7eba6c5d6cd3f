//! Messages exchanged with the embedded engine.
//!
//! Every call across the engine boundary carries one bincode-encoded
//! [`DbRequest`] and yields either a bincode-encoded [`DbResponse`] or a
//! bincode-encoded [`BackendError`] envelope.

pub mod error;
pub mod request;
pub mod response;
pub mod value;

pub use error::*;
pub use request::*;
pub use response::*;
pub use value::*;

use serde::{de::DeserializeOwned, Serialize};

pub fn encode<T: Serialize>(message: &T) -> Result<Vec<u8>, CodecError> { bincode::serialize(message).map_err(CodecError::Encode) }

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> { bincode::deserialize(bytes).map_err(CodecError::Decode) }

/// Encode an error envelope. Encoding a plain struct of an enum and a string cannot fail.
pub fn encode_error(error: &BackendError) -> Vec<u8> { bincode::serialize(error).unwrap_or_default() }
