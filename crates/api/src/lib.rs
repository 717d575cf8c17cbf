//! Document store adapters.
//!
//! This crate defines the contract the lookup engine uses to talk to a
//! document store and ships two implementations of it:
//!
//! - [`FirestoreConnector`] reads documents over the Firestore REST API,
//!   honouring `FIRESTORE_EMULATOR_HOST` and `GOOGLE_OAUTH_ACCESS_TOKEN`.
//! - [`MemoryStore`] keeps documents in process and counts connection
//!   activity; fixtures use the same wire format as the REST API.
//!
//! # Example
//!
//! ```ignore
//! use docsource_api::{FirestoreConnector, StoreConnector};
//! use docsource_types::DocumentPath;
//!
//! let connector = FirestoreConnector::from_env(None, None)?;
//! let mut connection = connector.connect("my-project", "(default)")?;
//! let path = DocumentPath::parse("users/alice")?;
//! let snapshot = connection.resolve(&path)?.fetch()?;
//! connection.close();
//! ```

pub mod codec;
pub mod firestore;
pub mod memory;
pub mod store;

pub use codec::{CodecError, decode_document};
pub use firestore::{FirestoreConnection, FirestoreConnector};
pub use memory::{MemoryStore, MemoryStoreStats};
pub use store::{DocumentHandle, DocumentSnapshot, StoreConnection, StoreConnector, StoreError};
