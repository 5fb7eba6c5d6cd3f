use serde::{Deserialize, Serialize};

/// A single field of a result row, or a bind argument.
///
/// Exactly one storage class is set at a time; `Null` stands for a missing value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum SqlValue {
    #[default]
    Null,
    Integer(i64),
    Double(f64),
    Text(String),
    Blob(Vec<u8>),
}

/// The storage class of a field, as reported by `Cursor::get_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Null,
    Integer,
    Float,
    String,
    Blob,
}

impl SqlValue {
    pub fn field_type(&self) -> FieldType {
        match self {
            SqlValue::Null => FieldType::Null,
            SqlValue::Integer(_) => FieldType::Integer,
            SqlValue::Double(_) => FieldType::Float,
            SqlValue::Text(_) => FieldType::String,
            SqlValue::Blob(_) => FieldType::Blob,
        }
    }

    pub fn is_null(&self) -> bool { matches!(self, SqlValue::Null) }

    /// Approximate number of bytes this value occupies in a result page
    pub fn estimated_size(&self) -> usize {
        match self {
            SqlValue::Null => 1,
            SqlValue::Integer(_) | SqlValue::Double(_) => 8,
            SqlValue::Text(s) => s.len(),
            SqlValue::Blob(b) => b.len(),
        }
    }
}

impl std::fmt::Display for SqlValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlValue::Null => write!(f, "NULL"),
            SqlValue::Integer(i) => write!(f, "{}", i),
            SqlValue::Double(d) => write!(f, "{:?}", d),
            SqlValue::Text(s) => write!(f, "'{}'", s),
            SqlValue::Blob(b) => write!(f, "<blob {}b>", b.len()),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self { SqlValue::Integer(value) }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self { SqlValue::Integer(value as i64) }
}

impl From<u32> for SqlValue {
    fn from(value: u32) -> Self { SqlValue::Integer(value as i64) }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self { SqlValue::Integer(if value { 1 } else { 0 }) }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self { SqlValue::Double(value) }
}

impl From<f32> for SqlValue {
    fn from(value: f32) -> Self { SqlValue::Double(value as f64) }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self { SqlValue::Text(value) }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self { SqlValue::Text(value.to_owned()) }
}

impl From<Vec<u8>> for SqlValue {
    fn from(value: Vec<u8>) -> Self { SqlValue::Blob(value) }
}

impl From<&[u8]> for SqlValue {
    fn from(value: &[u8]) -> Self { SqlValue::Blob(value.to_vec()) }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => SqlValue::Null,
        }
    }
}
