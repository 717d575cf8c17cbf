//! Store adapter contract.
//!
//! A [`StoreConnector`] opens a [`StoreConnection`] to one database of one
//! store instance. The connection resolves document paths into
//! [`DocumentHandle`]s, and a handle fetches a [`DocumentSnapshot`].
//! Connections must be closed exactly once; `close` is idempotent so a scope
//! guard can call it unconditionally.

use docsource_types::{DocumentPath, RawFieldMap};
use thiserror::Error;

use crate::codec::CodecError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document not found: {path}")]
    NotFound { path: String },

    #[error("invalid document path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("unauthenticated: {message}")]
    Unauthenticated { message: String },

    #[error("permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("store returned HTTP {code}: {message}")]
    Status { code: u16, message: String },

    #[error("transport error: {message}")]
    Transport { message: String },

    #[error("could not decode document: {0}")]
    Decode(#[from] CodecError),

    #[error("connection already closed")]
    Closed,

    #[error("invalid store configuration: {message}")]
    Config { message: String },
}

impl StoreError {
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into() }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }
}

/// Result of fetching one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentSnapshot {
    pub exists: bool,
    pub fields: RawFieldMap,
}

impl DocumentSnapshot {
    pub fn found(fields: RawFieldMap) -> Self {
        Self { exists: true, fields }
    }

    pub fn missing() -> Self {
        Self::default()
    }
}

/// Opens connections to a document store.
pub trait StoreConnector: Send + Sync {
    fn connect(&self, store_id: &str, database_id: &str) -> Result<Box<dyn StoreConnection>, StoreError>;
}

/// An open connection to one database.
pub trait StoreConnection: Send {
    /// Turn a validated path into a handle. No I/O happens here.
    fn resolve<'a>(&'a self, path: &DocumentPath) -> Result<Box<dyn DocumentHandle + 'a>, StoreError>;

    /// Release the connection. Calling this more than once has no effect.
    fn close(&mut self);
}

/// A document addressed through an open connection.
pub trait DocumentHandle {
    fn path(&self) -> &DocumentPath;

    /// Read the document. A missing document is `Ok` with `exists == false`.
    fn fetch(&self) -> Result<DocumentSnapshot, StoreError>;
}
