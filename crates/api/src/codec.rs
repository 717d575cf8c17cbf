//! Decoding of Firestore REST document payloads.
//!
//! Every field value on the wire is a single-key object naming its type:
//!
//! ```text
//! { "fields": {
//!     "key1": { "stringValue": "avalue" },
//!     "key2": { "integerValue": "5" },
//!     "key3": { "booleanValue": true },
//!     "tags": { "arrayValue": { "values": [ { "stringValue": "a" } ] } }
//! } }
//! ```
//!
//! Decoding is lossless into [`RawValue`]; deciding which kinds can be
//! republished is left to the translator.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use docsource_types::{RawFieldMap, RawValue};
use serde_json::{Map as JsonMap, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("expected a JSON object for {context}")]
    NotAnObject { context: String },

    #[error("field '{field}' has no recognised value type (keys: {found})")]
    UnknownValueType { field: String, found: String },

    #[error("field '{field}' holds an invalid {kind}: {reason}")]
    Invalid {
        field: String,
        kind: &'static str,
        reason: String,
    },
}

fn invalid(field: &str, kind: &'static str, reason: impl Into<String>) -> CodecError {
    CodecError::Invalid {
        field: field.to_string(),
        kind,
        reason: reason.into(),
    }
}

/// Decode a document resource. A document without `fields` is empty.
pub fn decode_document(document: &Value) -> Result<RawFieldMap, CodecError> {
    let object = document.as_object().ok_or_else(|| CodecError::NotAnObject {
        context: "document".into(),
    })?;
    match object.get("fields") {
        None | Some(Value::Null) => Ok(RawFieldMap::new()),
        Some(Value::Object(fields)) => decode_fields("", fields),
        Some(_) => Err(CodecError::NotAnObject {
            context: "document fields".into(),
        }),
    }
}

/// Decode a `fields` map. `prefix` labels nested fields in error messages.
pub fn decode_fields(prefix: &str, fields: &JsonMap<String, Value>) -> Result<RawFieldMap, CodecError> {
    fields
        .iter()
        .map(|(name, value)| {
            let label = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{prefix}.{name}")
            };
            decode_value(&label, value).map(|decoded| (name.clone(), decoded))
        })
        .collect()
}

/// Decode a single typed wire value.
pub fn decode_value(field: &str, value: &Value) -> Result<RawValue, CodecError> {
    let object = value.as_object().ok_or_else(|| CodecError::NotAnObject {
        context: format!("field '{field}'"),
    })?;
    let mut entries = object.iter();
    let (kind, payload) = match (entries.next(), entries.next()) {
        (Some(entry), None) => entry,
        _ => {
            return Err(CodecError::UnknownValueType {
                field: field.to_string(),
                found: object.keys().cloned().collect::<Vec<_>>().join(", "),
            });
        }
    };

    match kind.as_str() {
        "nullValue" => Ok(RawValue::Null),
        "booleanValue" => payload
            .as_bool()
            .map(RawValue::Bool)
            .ok_or_else(|| invalid(field, "boolean", "expected true or false")),
        "integerValue" => decode_integer(field, payload).map(RawValue::Integer),
        "doubleValue" => decode_double(field, payload).map(RawValue::Float),
        "stringValue" => payload
            .as_str()
            .map(|text| RawValue::String(text.to_string()))
            .ok_or_else(|| invalid(field, "string", "expected a JSON string")),
        "timestampValue" => {
            let text = payload
                .as_str()
                .ok_or_else(|| invalid(field, "timestamp", "expected an RFC 3339 string"))?;
            DateTime::parse_from_rfc3339(text)
                .map(|timestamp| RawValue::Timestamp(timestamp.with_timezone(&Utc)))
                .map_err(|error| invalid(field, "timestamp", error.to_string()))
        }
        "bytesValue" => {
            let text = payload
                .as_str()
                .ok_or_else(|| invalid(field, "bytes", "expected a base64 string"))?;
            STANDARD
                .decode(text)
                .map(RawValue::Bytes)
                .map_err(|error| invalid(field, "bytes", error.to_string()))
        }
        "referenceValue" => payload
            .as_str()
            .map(|name| RawValue::Reference(name.to_string()))
            .ok_or_else(|| invalid(field, "reference", "expected a resource name string")),
        "geoPointValue" => {
            // Zero coordinates are omitted on the wire.
            let coordinate = |name: &str| payload.get(name).and_then(Value::as_f64).unwrap_or_default();
            if !payload.is_object() {
                return Err(invalid(field, "geo point", "expected an object"));
            }
            Ok(RawValue::GeoPoint {
                latitude: coordinate("latitude"),
                longitude: coordinate("longitude"),
            })
        }
        "arrayValue" => match payload.get("values") {
            None | Some(Value::Null) => Ok(RawValue::Array(Vec::new())),
            Some(Value::Array(values)) => values
                .iter()
                .enumerate()
                .map(|(index, element)| decode_value(&format!("{field}[{index}]"), element))
                .collect::<Result<Vec<_>, _>>()
                .map(RawValue::Array),
            Some(_) => Err(invalid(field, "array", "expected 'values' to be a list")),
        },
        "mapValue" => match payload.get("fields") {
            None | Some(Value::Null) => Ok(RawValue::Map(RawFieldMap::new())),
            Some(Value::Object(fields)) => decode_fields(field, fields).map(RawValue::Map),
            Some(_) => Err(invalid(field, "map", "expected 'fields' to be an object")),
        },
        _ => Err(CodecError::UnknownValueType {
            field: field.to_string(),
            found: kind.clone(),
        }),
    }
}

/// int64 values travel as decimal strings; some emulators send plain numbers.
fn decode_integer(field: &str, payload: &Value) -> Result<i64, CodecError> {
    match payload {
        Value::String(text) => text
            .parse::<i64>()
            .map_err(|error| invalid(field, "integer", format!("'{text}': {error}"))),
        Value::Number(number) => number
            .as_i64()
            .ok_or_else(|| invalid(field, "integer", format!("{number} does not fit in 64 bits"))),
        _ => Err(invalid(field, "integer", "expected a decimal string")),
    }
}

fn decode_double(field: &str, payload: &Value) -> Result<f64, CodecError> {
    match payload {
        Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| invalid(field, "float", format!("{number} is not representable"))),
        Value::String(text) => match text.as_str() {
            "NaN" => Ok(f64::NAN),
            "Infinity" => Ok(f64::INFINITY),
            "-Infinity" => Ok(f64::NEG_INFINITY),
            other => other
                .parse::<f64>()
                .map_err(|error| invalid(field, "float", format!("'{other}': {error}"))),
        },
        _ => Err(invalid(field, "float", "expected a number")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsource_types::RawValueKind;
    use serde_json::json;

    #[test]
    fn decodes_supported_scalars() {
        let fields = decode_document(&json!({
            "name": "projects/p/databases/test-firestore-infra/documents/provider/basicTest",
            "fields": {
                "key1": { "stringValue": "avalue" },
                "key2": { "integerValue": "5" },
                "key3": { "booleanValue": true },
                "key4": { "nullValue": null }
            }
        }))
        .expect("decode document");

        assert_eq!(fields.get("key1"), Some(&RawValue::String("avalue".into())));
        assert_eq!(fields.get("key2"), Some(&RawValue::Integer(5)));
        assert_eq!(fields.get("key3"), Some(&RawValue::Bool(true)));
        assert_eq!(fields.get("key4"), Some(&RawValue::Null));
    }

    #[test]
    fn document_without_fields_is_empty() {
        let fields = decode_document(&json!({ "name": "projects/p/databases/d/documents/a/b" })).expect("decode");
        assert!(fields.is_empty());
    }

    #[test]
    fn decodes_unsupported_kinds_losslessly() {
        let fields = decode_document(&json!({
            "fields": {
                "price": { "doubleValue": 2.75 },
                "ratio": { "doubleValue": "NaN" },
                "created": { "timestampValue": "2024-05-01T12:30:00.123456Z" },
                "blob": { "bytesValue": "aGVsbG8=" },
                "owner": { "referenceValue": "projects/p/databases/d/documents/users/alice" },
                "where": { "geoPointValue": { "latitude": 48.85 } },
                "tags": { "arrayValue": { "values": [ { "stringValue": "a" }, { "integerValue": 2 } ] } },
                "empty": { "arrayValue": {} },
                "meta": { "mapValue": { "fields": { "inner": { "booleanValue": false } } } }
            }
        }))
        .expect("decode document");

        let kind = |name: &str| fields.get(name).map(RawValue::kind);
        assert_eq!(kind("price"), Some(RawValueKind::Float));
        assert_eq!(kind("created"), Some(RawValueKind::Timestamp));
        assert_eq!(fields.get("blob"), Some(&RawValue::Bytes(b"hello".to_vec())));
        assert_eq!(kind("owner"), Some(RawValueKind::Reference));
        assert_eq!(
            fields.get("where"),
            Some(&RawValue::GeoPoint {
                latitude: 48.85,
                longitude: 0.0
            })
        );
        assert_eq!(
            fields.get("tags"),
            Some(&RawValue::Array(vec![RawValue::String("a".into()), RawValue::Integer(2)]))
        );
        assert_eq!(fields.get("empty"), Some(&RawValue::Array(Vec::new())));
        assert!(matches!(fields.get("ratio"), Some(RawValue::Float(value)) if value.is_nan()));

        let Some(RawValue::Map(meta)) = fields.get("meta") else {
            panic!("meta should decode as a map");
        };
        assert_eq!(meta.get("inner"), Some(&RawValue::Bool(false)));
    }

    #[test]
    fn rejects_unknown_value_types() {
        let error = decode_document(&json!({ "fields": { "k": { "vectorValue": {} } } })).expect_err("unknown type");
        assert_eq!(
            error,
            CodecError::UnknownValueType {
                field: "k".into(),
                found: "vectorValue".into()
            }
        );
    }

    #[test]
    fn nested_errors_name_the_full_field_path() {
        let error = decode_document(&json!({
            "fields": { "meta": { "mapValue": { "fields": {
                "list": { "arrayValue": { "values": [ { "integerValue": "seven" } ] } }
            } } } }
        }))
        .expect_err("bad integer");
        assert!(matches!(error, CodecError::Invalid { ref field, kind: "integer", .. } if field == "meta.list[0]"));
    }

    #[test]
    fn rejects_malformed_value_objects() {
        assert!(matches!(
            decode_value("k", &json!("plain")),
            Err(CodecError::NotAnObject { .. })
        ));
        assert!(matches!(
            decode_value("k", &json!({})),
            Err(CodecError::UnknownValueType { .. })
        ));
        assert!(matches!(
            decode_value("k", &json!({ "booleanValue": "yes" })),
            Err(CodecError::Invalid { kind: "boolean", .. })
        ));
        assert!(matches!(
            decode_value("k", &json!({ "integerValue": "99999999999999999999" })),
            Err(CodecError::Invalid { kind: "integer", .. })
        ));
    }
}
