//! Document lookup orchestration.

use std::sync::Arc;

use docsource_api::{StoreConnector, StoreError};
use docsource_types::{Diagnostics, DocumentPath, LookupCoordinates, LookupError, ObjectValue};
use docsource_util::redact_sensitive;
use serde_json::{Map as JsonMap, Value};
use tracing::{debug, info, warn};

use crate::guard::ConnectionGuard;
use crate::model::{DocumentRequest, DocumentState, ReadResponse};
use crate::provider::DataSource;
use crate::schema::{AttributeSchema, Schema};
use crate::translate::translate;

fn failure(error: LookupError) -> Diagnostics {
    warn!(summary = error.summary(), "{error}");
    Diagnostics::from(error.to_diagnostic())
}

fn not_found(path: &DocumentPath, error: &StoreError) -> Diagnostics {
    failure(LookupError::not_found(path.as_str(), redact_sensitive(&error.to_string())))
}

/// Fetch one document and translate its fields.
///
/// The connection is scoped to this call and released on every exit path.
/// The path is checked locally before anything is fetched, and a result is
/// only returned when no error diagnostic was raised.
pub fn lookup_document(connector: &dyn StoreConnector, coordinates: &LookupCoordinates) -> Result<ObjectValue, Diagnostics> {
    let connection = ConnectionGuard::open(connector, coordinates.store_id(), coordinates.database_id())
        .map_err(|error| failure(LookupError::connection(redact_sensitive(&error.to_string()))))?;

    let path = coordinates.path().map_err(|error| failure(error.into()))?;
    info!(path = %path, "resolved document path");

    let snapshot = {
        let document = connection.resolve(&path).map_err(|error| match error {
            StoreError::InvalidPath { path, reason } => failure(LookupError::path(path, reason)),
            other => not_found(&path, &other),
        })?;
        debug!(path = %document.path(), "fetching document");
        document.fetch().map_err(|error| not_found(&path, &error))?
    };
    drop(connection);

    if !snapshot.exists {
        return Err(not_found(&path, &StoreError::not_found(path.as_str())));
    }

    let translation = translate(snapshot.fields);
    if translation.is_valid() {
        info!(path = %path, fields = translation.fields.len(), "document read");
        Ok(translation.fields)
    } else {
        warn!(path = %path, errors = translation.diagnostics.error_count(), "document holds unsupported fields");
        Err(translation.diagnostics)
    }
}

/// Data source reading a single document by its coordinates.
pub struct DocumentDataSource {
    type_name: String,
    schema: Schema,
    connector: Arc<dyn StoreConnector>,
}

impl DocumentDataSource {
    pub fn new(provider_type: &str, connector: Arc<dyn StoreConnector>) -> Self {
        Self {
            type_name: format!("{provider_type}_firestore_document"),
            schema: document_schema(),
            connector,
        }
    }
}

impl DataSource for DocumentDataSource {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn read(&self, config: &JsonMap<String, Value>) -> ReadResponse {
        let diagnostics = self.schema.validate_config(config);
        if diagnostics.has_error() {
            return ReadResponse::failed(diagnostics);
        }

        let request: DocumentRequest = match serde_json::from_value(Value::Object(config.clone())) {
            Ok(request) => request,
            Err(error) => {
                let mut diagnostics = diagnostics;
                diagnostics.add_error("Invalid configuration", error.to_string());
                return ReadResponse::failed(diagnostics);
            }
        };
        let coordinates = match request.coordinates() {
            Ok(coordinates) => coordinates,
            Err(error) => return ReadResponse::failed(failure(error)),
        };

        match lookup_document(self.connector.as_ref(), &coordinates) {
            Ok(fields) => ReadResponse {
                state: Some(DocumentState { coordinates, fields }),
                diagnostics,
            },
            Err(errors) => {
                let mut diagnostics = diagnostics;
                diagnostics.append(errors);
                ReadResponse::failed(diagnostics)
            }
        }
    }
}

fn document_schema() -> Schema {
    Schema::new("Reads a single document and exposes its boolean, string, integer and null fields.")
        .with_attribute(
            "store_id",
            AttributeSchema::required_string("Identifier of the store instance (the Google Cloud project).").with_alias("project"),
        )
        .with_attribute(
            "database_id",
            AttributeSchema::required_string("Database within the store, for example `(default)`.").with_alias("database"),
        )
        .with_attribute(
            "collection",
            AttributeSchema::required_string("Collection path. Nested collections are written as `parent/id/child`."),
        )
        .with_attribute(
            "record_id",
            AttributeSchema::required_string("Identifier of the document within `collection`.").with_alias("document_id"),
        )
        .with_attribute(
            "fields",
            AttributeSchema::computed_dynamic(
                "Document fields keyed by name. Only boolean, string, integer and null values are supported.",
            ),
        )
}
