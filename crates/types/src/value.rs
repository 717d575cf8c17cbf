//! Raw and typed field values.
//!
//! [`RawValue`] mirrors the document store's native type universe. Only a
//! subset of it can be republished: [`TypedValue`] is the closed set of
//! values the lookup result may carry, and every typed value reports its own
//! [`TypeDescriptor`] so the result schema is derived from the data itself.

use std::fmt;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Field name to raw value, in the order the store delivered them.
pub type RawFieldMap = IndexMap<String, RawValue>;

/// A field value as held by the document store.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Bool(bool),
    Integer(i64),
    String(String),
    Float(f64),
    Timestamp(DateTime<Utc>),
    Bytes(Vec<u8>),
    /// Fully qualified resource name of another document.
    Reference(String),
    GeoPoint {
        latitude: f64,
        longitude: f64,
    },
    Array(Vec<RawValue>),
    Map(RawFieldMap),
}

impl RawValue {
    /// The kind tag of this value.
    pub fn kind(&self) -> RawValueKind {
        match self {
            Self::Null => RawValueKind::Null,
            Self::Bool(_) => RawValueKind::Bool,
            Self::Integer(_) => RawValueKind::Integer,
            Self::String(_) => RawValueKind::String,
            Self::Float(_) => RawValueKind::Float,
            Self::Timestamp(_) => RawValueKind::Timestamp,
            Self::Bytes(_) => RawValueKind::Bytes,
            Self::Reference(_) => RawValueKind::Reference,
            Self::GeoPoint { .. } => RawValueKind::GeoPoint,
            Self::Array(_) => RawValueKind::Array,
            Self::Map(_) => RawValueKind::Map,
        }
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Kind tag of a [`RawValue`], used in diagnostics and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawValueKind {
    Null,
    Bool,
    Integer,
    String,
    Float,
    Timestamp,
    Bytes,
    Reference,
    GeoPoint,
    Array,
    Map,
}

impl RawValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Integer => "integer",
            Self::String => "string",
            Self::Float => "float",
            Self::Timestamp => "timestamp",
            Self::Bytes => "bytes",
            Self::Reference => "reference",
            Self::GeoPoint => "geo point",
            Self::Array => "array",
            Self::Map => "map",
        }
    }

    /// Whether values of this kind can be republished as a [`TypedValue`].
    pub fn is_supported(&self) -> bool {
        matches!(self, Self::Null | Self::Bool | Self::Integer | Self::String)
    }
}

impl fmt::Display for RawValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved type of a typed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeDescriptor {
    Bool,
    String,
    Int64,
}

impl TypeDescriptor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::String => "string",
            Self::Int64 => "int64",
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A republishable field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedValue {
    Bool(bool),
    String(String),
    Int64(i64),
    /// Explicit null carrying the type it was inferred as.
    Null(TypeDescriptor),
}

impl TypedValue {
    /// Null typed as a string, the inference used when nothing else is known.
    pub fn string_null() -> Self {
        Self::Null(TypeDescriptor::String)
    }

    /// The value's own type. A null reports the type it was inferred as.
    pub fn type_descriptor(&self) -> TypeDescriptor {
        match self {
            Self::Bool(_) => TypeDescriptor::Bool,
            Self::String(_) => TypeDescriptor::String,
            Self::Int64(_) => TypeDescriptor::Int64,
            Self::Null(descriptor) => *descriptor,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int64(value) => Some(*value),
            _ => None,
        }
    }

    /// Plain JSON rendering; nulls lose their inferred type.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Bool(value) => Value::Bool(*value),
            Self::String(value) => Value::String(value.clone()),
            Self::Int64(value) => Value::from(*value),
            Self::Null(_) => Value::Null,
        }
    }
}

impl Serialize for TypedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Bool(value) => serializer.serialize_bool(*value),
            Self::String(value) => serializer.serialize_str(value),
            Self::Int64(value) => serializer.serialize_i64(*value),
            Self::Null(_) => serializer.serialize_none(),
        }
    }
}
