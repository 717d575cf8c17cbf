//! Document paths.
//!
//! A document path alternates collection and document segments, so a valid
//! path always has an even number of non-empty segments and never starts with
//! a slash: `users/alice` or `users/alice/orders/42`.

use std::fmt;

use thiserror::Error;

/// Why a candidate path cannot address a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("document path is empty")]
    Empty,

    #[error("document path '{path}' starts with '/'")]
    LeadingSlash { path: String },

    #[error("document path '{path}' has {segments} segments; a document path needs an even number")]
    OddSegments { path: String, segments: usize },

    #[error("document path '{path}' has an empty segment at position {position}")]
    EmptySegment { path: String, position: usize },
}

/// A validated, slash-separated document path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentPath(String);

impl DocumentPath {
    /// Validate a full document path.
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if path.is_empty() {
            return Err(PathError::Empty);
        }
        if path.starts_with('/') {
            return Err(PathError::LeadingSlash { path: path.to_string() });
        }

        let segments: Vec<&str> = path.split('/').collect();
        if segments.len() % 2 != 0 {
            return Err(PathError::OddSegments {
                path: path.to_string(),
                segments: segments.len(),
            });
        }
        if let Some(position) = segments.iter().position(|segment| segment.is_empty()) {
            return Err(PathError::EmptySegment {
                path: path.to_string(),
                position,
            });
        }

        Ok(Self(path.to_string()))
    }

    /// Join a collection path and a document id, then validate the result.
    ///
    /// The collection may itself be nested (`users/alice/orders`).
    pub fn from_parts(collection: &str, document_id: &str) -> Result<Self, PathError> {
        Self::parse(&format!("{collection}/{document_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Path of the collection that holds this document.
    pub fn collection_path(&self) -> &str {
        self.0.rsplit_once('/').map(|(collection, _)| collection).unwrap_or_default()
    }

    /// Last segment: the document's id within its collection.
    pub fn document_id(&self) -> &str {
        self.0.rsplit_once('/').map(|(_, id)| id).unwrap_or(&self.0)
    }
}

/// Build the document path for `collection` and `record_id`.
///
/// This is purely local; nothing is contacted to validate the path.
pub fn resolve_path(collection: &str, record_id: &str) -> Result<DocumentPath, PathError> {
    DocumentPath::from_parts(collection, record_id)
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DocumentPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
