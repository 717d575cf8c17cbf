//! # Docsource Engine
//!
//! Reads one document from a store and republishes its fields as typed
//! values.
//!
//! ## Flow
//!
//! 1. The request is validated against the data source [`Schema`].
//! 2. [`lookup_document`] opens a scoped connection, checks the document
//!    path locally, fetches the document and hands its fields to
//!    [`translate`].
//! 3. Every problem becomes a diagnostic; a [`DocumentState`] is only
//!    committed when none of them is an error.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use docsource_api::MemoryStore;
//! use docsource_engine::Provider;
//! use docsource_types::{DocumentPath, RawValue};
//! use docsource_util::ProviderConfig;
//! use serde_json::json;
//!
//! let path = DocumentPath::parse("users/alice")?;
//! let store = MemoryStore::new().with_document(
//!     "my-project",
//!     "(default)",
//!     &path,
//!     [("name".to_string(), RawValue::from("Alice"))].into_iter().collect(),
//! );
//! let provider = Provider::new(&ProviderConfig::default(), Arc::new(store));
//! let source = provider.data_source("docsource_firestore_document").expect("registered");
//!
//! let config = json!({
//!     "store_id": "my-project",
//!     "database_id": "(default)",
//!     "collection": "users",
//!     "record_id": "alice"
//! });
//! let response = source.read(config.as_object().expect("object"));
//! assert!(!response.has_error());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod guard;
pub mod lookup;
pub mod model;
pub mod provider;
pub mod schema;
pub mod translate;

pub use guard::ConnectionGuard;
pub use lookup::{DocumentDataSource, lookup_document};
pub use model::{DocumentRequest, DocumentState, ReadResponse};
pub use provider::{DataSource, DataSourceConstructor, Provider, ProviderMetadata};
pub use schema::{AttributeSchema, AttributeType, Schema};
pub use translate::{Translation, translate, translate_value};
