//! Lookup error taxonomy and its mapping onto diagnostics.

use thiserror::Error;

use crate::{Diagnostic, PathError, RawValueKind};

pub const SUMMARY_MISSING_ATTRIBUTE: &str = "Missing required attribute";
pub const SUMMARY_CONNECTION: &str = "Could not init store client";
pub const SUMMARY_INVALID_PATH: &str = "Invalid document path";
pub const SUMMARY_NOT_FOUND: &str = "Could not find document";
pub const SUMMARY_UNSUPPORTED_TYPE: &str = "Invalid data type in store";

const PATH_RULE: &str = "Path must be a list of string separated by slashes of even length. It must not start with a /";
const SUPPORTED_TYPES: &str = "Only Boolean, String, Integer and null values are readable via this provider";

/// Everything that can stop a lookup or a single field from being republished.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("missing required attribute '{attribute}'")]
    Configuration { attribute: String },

    #[error("could not connect to store: {message}")]
    Connection { message: String },

    #[error("invalid document path '{path}': {reason}")]
    Path { path: String, reason: String },

    #[error("document '{path}' not found: {message}")]
    NotFound { path: String, message: String },

    #[error("field '{field}' holds an unsupported {kind} value")]
    UnsupportedType { field: String, kind: RawValueKind },
}

impl LookupError {
    pub fn configuration(attribute: impl Into<String>) -> Self {
        Self::Configuration {
            attribute: attribute.into(),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection { message: message.into() }
    }

    pub fn path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Path {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn not_found(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn unsupported_type(field: impl Into<String>, kind: RawValueKind) -> Self {
        Self::UnsupportedType {
            field: field.into(),
            kind,
        }
    }

    /// Stable summary line for the diagnostic this error becomes.
    pub fn summary(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => SUMMARY_MISSING_ATTRIBUTE,
            Self::Connection { .. } => SUMMARY_CONNECTION,
            Self::Path { .. } => SUMMARY_INVALID_PATH,
            Self::NotFound { .. } => SUMMARY_NOT_FOUND,
            Self::UnsupportedType { .. } => SUMMARY_UNSUPPORTED_TYPE,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            Self::Configuration { attribute } => {
                format!("The argument \"{attribute}\" is required, but no definition was found.")
            }
            Self::Connection { message } => message.clone(),
            Self::Path { path, reason } => format!("{PATH_RULE}. Got '{path}': {reason}"),
            Self::NotFound { message, .. } => message.clone(),
            Self::UnsupportedType { field, kind } => {
                format!("{SUPPORTED_TYPES}; field \"{field}\" holds a {kind} value")
            }
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.summary(), self.detail())
    }
}

impl From<PathError> for LookupError {
    fn from(error: PathError) -> Self {
        let path = match &error {
            PathError::Empty => String::new(),
            PathError::LeadingSlash { path } | PathError::OddSegments { path, .. } | PathError::EmptySegment { path, .. } => path.clone(),
        };
        Self::Path {
            path,
            reason: error.to_string(),
        }
    }
}

impl From<LookupError> for Diagnostic {
    fn from(error: LookupError) -> Self {
        error.to_diagnostic()
    }
}
