//! Request and response shapes for a document read.
//!
//! A [`DocumentRequest`] is the caller's configuration after schema
//! validation. A [`ReadResponse`] carries the committed [`DocumentState`]
//! (only when the read produced no error) plus every diagnostic collected on
//! the way.

use docsource_types::{Diagnostics, LookupCoordinates, LookupError, ObjectValue};
use serde::{Deserialize, Serialize, Serializer, ser::SerializeStruct};

/// Coordinates as supplied by the caller. Aliases mirror the schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DocumentRequest {
    #[serde(default, alias = "project")]
    pub store_id: Option<String>,
    #[serde(default, alias = "database")]
    pub database_id: Option<String>,
    #[serde(default)]
    pub collection: Option<String>,
    #[serde(default, alias = "document_id")]
    pub record_id: Option<String>,
}

impl DocumentRequest {
    /// Build lookup coordinates. Missing attributes are configuration errors;
    /// empty collection or record ids are left for path validation.
    pub fn coordinates(&self) -> Result<LookupCoordinates, LookupError> {
        let required = |value: &Option<String>, name: &str| value.clone().ok_or_else(|| LookupError::configuration(name));
        LookupCoordinates::new(
            required(&self.store_id, "store_id")?,
            required(&self.database_id, "database_id")?,
            required(&self.collection, "collection")?,
            required(&self.record_id, "record_id")?,
        )
    }
}

/// Committed result of a successful read.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentState {
    pub coordinates: LookupCoordinates,
    pub fields: ObjectValue,
}

impl Serialize for DocumentState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("DocumentState", 6)?;
        state.serialize_field("store_id", self.coordinates.store_id())?;
        state.serialize_field("database_id", self.coordinates.database_id())?;
        state.serialize_field("collection", self.coordinates.collection())?;
        state.serialize_field("record_id", self.coordinates.record_id())?;
        state.serialize_field("fields", &self.fields)?;
        state.serialize_field("field_types", self.fields.attribute_types())?;
        state.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReadResponse {
    pub state: Option<DocumentState>,
    pub diagnostics: Diagnostics,
}

impl ReadResponse {
    pub fn failed(diagnostics: Diagnostics) -> Self {
        Self {
            state: None,
            diagnostics,
        }
    }

    pub fn has_error(&self) -> bool {
        self.diagnostics.has_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsource_types::{TypeDescriptor, TypedValue};
    use indexmap::IndexMap;
    use serde_json::json;

    #[test]
    fn request_accepts_aliases() {
        let request: DocumentRequest = serde_json::from_value(json!({
            "project": "p",
            "database": "(default)",
            "collection": "users",
            "document_id": "alice"
        }))
        .expect("request");
        let coordinates = request.coordinates().expect("coordinates");
        assert_eq!(coordinates.store_id(), "p");
        assert_eq!(coordinates.record_id(), "alice");
    }

    #[test]
    fn missing_coordinates_are_configuration_errors() {
        let request = DocumentRequest {
            store_id: Some("p".into()),
            database_id: Some("d".into()),
            collection: Some("c".into()),
            record_id: None,
        };
        assert_eq!(request.coordinates(), Err(LookupError::configuration("record_id")));
    }

    #[test]
    fn state_serializes_values_and_types() {
        let fields = ObjectValue::new(
            IndexMap::from([
                ("n".to_string(), TypeDescriptor::Int64),
                ("gone".to_string(), TypeDescriptor::String),
            ]),
            IndexMap::from([
                ("n".to_string(), TypedValue::Int64(5)),
                ("gone".to_string(), TypedValue::string_null()),
            ]),
        )
        .expect("consistent object");
        let response = ReadResponse {
            state: Some(DocumentState {
                coordinates: LookupCoordinates::new("p", "d", "c", "r").expect("coordinates"),
                fields,
            }),
            diagnostics: Diagnostics::new(),
        };

        assert_eq!(
            serde_json::to_value(&response).expect("serialize"),
            json!({
                "state": {
                    "store_id": "p",
                    "database_id": "d",
                    "collection": "c",
                    "record_id": "r",
                    "fields": { "gone": null, "n": 5 },
                    "field_types": { "gone": "string", "n": "int64" }
                },
                "diagnostics": []
            })
        );
    }
}
