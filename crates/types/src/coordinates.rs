use serde::Serialize;

use crate::{DocumentPath, LookupError, PathError, resolve_path};

/// Identifies one record: which store instance, which database, and where in
/// the database the document lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupCoordinates {
    store_id: String,
    database_id: String,
    collection: String,
    record_id: String,
}

impl LookupCoordinates {
    /// Store and database ids must be non-blank. Collection and record id are
    /// checked structurally by [`LookupCoordinates::path`].
    pub fn new(
        store_id: impl Into<String>,
        database_id: impl Into<String>,
        collection: impl Into<String>,
        record_id: impl Into<String>,
    ) -> Result<Self, LookupError> {
        let store_id = store_id.into();
        let database_id = database_id.into();
        if store_id.trim().is_empty() {
            return Err(LookupError::configuration("store_id"));
        }
        if database_id.trim().is_empty() {
            return Err(LookupError::configuration("database_id"));
        }
        Ok(Self {
            store_id,
            database_id,
            collection: collection.into(),
            record_id: record_id.into(),
        })
    }

    pub fn store_id(&self) -> &str {
        &self.store_id
    }

    pub fn database_id(&self) -> &str {
        &self.database_id
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn record_id(&self) -> &str {
        &self.record_id
    }

    /// The document path these coordinates address.
    pub fn path(&self) -> Result<DocumentPath, PathError> {
        resolve_path(&self.collection, &self.record_id)
    }
}
