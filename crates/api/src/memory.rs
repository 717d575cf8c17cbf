//! In-memory document store.
//!
//! Holds documents per `(store_id, database_id)` and counts connection and
//! fetch activity so callers can check how a lookup used the store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use docsource_types::{DocumentPath, RawFieldMap};
use serde_json::Value;
use tracing::debug;

use crate::codec::{CodecError, decode_document};
use crate::store::{DocumentHandle, DocumentSnapshot, StoreConnection, StoreConnector, StoreError};

type DatabaseKey = (String, String);

#[derive(Debug, Default)]
struct MemoryState {
    databases: HashMap<DatabaseKey, HashMap<String, RawFieldMap>>,
    connect_failure: Option<String>,
    opened: usize,
    closed: usize,
    fetches: usize,
}

/// Shared handle to an in-memory store. Clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

/// Activity observed by a [`MemoryStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoryStoreStats {
    pub opened: usize,
    pub closed: usize,
    pub fetches: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().expect("memory store lock poisoned")
    }

    /// Store `fields` at `path`, replacing any existing document.
    pub fn insert(&self, store_id: &str, database_id: &str, path: &DocumentPath, fields: RawFieldMap) {
        self.lock()
            .databases
            .entry((store_id.to_string(), database_id.to_string()))
            .or_default()
            .insert(path.as_str().to_string(), fields);
    }

    /// Builder form of [`MemoryStore::insert`].
    pub fn with_document(self, store_id: &str, database_id: &str, path: &DocumentPath, fields: RawFieldMap) -> Self {
        self.insert(store_id, database_id, path, fields);
        self
    }

    /// Make every subsequent `connect` fail with `message`.
    pub fn fail_connections(&self, message: impl Into<String>) {
        self.lock().connect_failure = Some(message.into());
    }

    /// Load documents from a fixture in the store's wire format:
    ///
    /// ```json
    /// { "my-project/(default)": { "provider/basicTest": { "fields": { "k": { "stringValue": "v" } } } } }
    /// ```
    pub fn from_fixture(fixture: &Value) -> Result<Self, StoreError> {
        let databases = fixture.as_object().ok_or_else(|| {
            StoreError::from(CodecError::NotAnObject {
                context: "fixture".into(),
            })
        })?;

        let store = Self::new();
        for (database_key, documents) in databases {
            let (store_id, database_id) = database_key
                .split_once('/')
                .ok_or_else(|| StoreError::config(format!("fixture key '{database_key}' must be '<store_id>/<database_id>'")))?;
            let documents = documents.as_object().ok_or_else(|| {
                StoreError::from(CodecError::NotAnObject {
                    context: format!("fixture database '{database_key}'"),
                })
            })?;
            for (path, document) in documents {
                let path =
                    DocumentPath::parse(path).map_err(|error| StoreError::invalid_path(path.clone(), error.to_string()))?;
                store.insert(store_id, database_id, &path, decode_document(document)?);
            }
        }
        Ok(store)
    }

    pub fn stats(&self) -> MemoryStoreStats {
        let state = self.lock();
        MemoryStoreStats {
            opened: state.opened,
            closed: state.closed,
            fetches: state.fetches,
        }
    }
}

impl StoreConnector for MemoryStore {
    fn connect(&self, store_id: &str, database_id: &str) -> Result<Box<dyn StoreConnection>, StoreError> {
        let mut state = self.lock();
        if let Some(message) = &state.connect_failure {
            return Err(StoreError::transport(message.clone()));
        }
        state.opened += 1;
        debug!(store_id, database_id, "opened in-memory connection");
        Ok(Box::new(MemoryConnection {
            store: self.clone(),
            key: (store_id.to_string(), database_id.to_string()),
            closed: false,
        }))
    }
}

#[derive(Debug)]
struct MemoryConnection {
    store: MemoryStore,
    key: DatabaseKey,
    closed: bool,
}

impl StoreConnection for MemoryConnection {
    fn resolve<'a>(&'a self, path: &DocumentPath) -> Result<Box<dyn DocumentHandle + 'a>, StoreError> {
        if self.closed {
            return Err(StoreError::Closed);
        }
        Ok(Box::new(MemoryDocument {
            connection: self,
            path: path.clone(),
        }))
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.store.lock().closed += 1;
        }
    }
}

struct MemoryDocument<'a> {
    connection: &'a MemoryConnection,
    path: DocumentPath,
}

impl DocumentHandle for MemoryDocument<'_> {
    fn path(&self) -> &DocumentPath {
        &self.path
    }

    fn fetch(&self) -> Result<DocumentSnapshot, StoreError> {
        let mut state = self.connection.store.lock();
        state.fetches += 1;
        let fields = state
            .databases
            .get(&self.connection.key)
            .and_then(|documents| documents.get(self.path.as_str()))
            .cloned();
        Ok(fields.map(DocumentSnapshot::found).unwrap_or_else(DocumentSnapshot::missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsource_types::RawValue;
    use serde_json::json;

    fn path(raw: &str) -> DocumentPath {
        DocumentPath::parse(raw).expect("valid path")
    }

    #[test]
    fn fetches_inserted_documents_per_database() {
        let fields: RawFieldMap = [("k".to_string(), RawValue::from("v"))].into_iter().collect();
        let store = MemoryStore::new().with_document("p", "db", &path("c/r"), fields.clone());

        let connection = store.connect("p", "db").expect("connect");
        let snapshot = connection.resolve(&path("c/r")).expect("resolve").fetch().expect("fetch");
        assert_eq!(snapshot, DocumentSnapshot::found(fields));

        let other = store.connect("p", "other-db").expect("connect");
        let missing = other.resolve(&path("c/r")).expect("resolve").fetch().expect("fetch");
        assert!(!missing.exists);
    }

    #[test]
    fn counts_connection_lifecycle() {
        let store = MemoryStore::new();
        let mut connection = store.connect("p", "db").expect("connect");
        connection.resolve(&path("c/r")).expect("resolve").fetch().expect("fetch");
        connection.close();
        connection.close();

        assert_eq!(
            store.stats(),
            MemoryStoreStats {
                opened: 1,
                closed: 1,
                fetches: 1
            }
        );
        assert!(matches!(connection.resolve(&path("c/r")), Err(StoreError::Closed)));
    }

    #[test]
    fn connect_failures_are_transport_errors() {
        let store = MemoryStore::new();
        store.fail_connections("no route to host");
        assert!(matches!(store.connect("p", "db"), Err(StoreError::Transport { .. })));
        assert_eq!(store.stats().opened, 0);
    }

    #[test]
    fn loads_wire_format_fixtures() {
        let store = MemoryStore::from_fixture(&json!({
            "my-project/(default)": {
                "provider/basicTest": { "fields": {
                    "key1": { "stringValue": "avalue" },
                    "key2": { "integerValue": "5" }
                } }
            }
        }))
        .expect("fixture");

        let connection = store.connect("my-project", "(default)").expect("connect");
        let snapshot = connection
            .resolve(&path("provider/basicTest"))
            .expect("resolve")
            .fetch()
            .expect("fetch");
        assert_eq!(snapshot.fields.get("key2"), Some(&RawValue::Integer(5)));
    }

    #[test]
    fn rejects_malformed_fixture_keys() {
        assert!(matches!(
            MemoryStore::from_fixture(&json!({ "no-slash": {} })),
            Err(StoreError::Config { .. })
        ));
        assert!(matches!(
            MemoryStore::from_fixture(&json!({ "p/d": { "odd": { "fields": {} } } })),
            Err(StoreError::InvalidPath { .. })
        ));
    }
}
