//! Shared types for the docsource workspace.
//!
//! - [`RawValue`] / [`RawFieldMap`]: what the document store hands back
//! - [`TypedValue`] / [`TypeDescriptor`] / [`ObjectValue`]: what a lookup republishes
//! - [`DocumentPath`] / [`LookupCoordinates`]: where a record lives
//! - [`Diagnostics`] / [`LookupError`]: how failures are reported

mod coordinates;
mod diagnostics;
mod error;
mod object;
mod path;
mod value;

pub use coordinates::LookupCoordinates;
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{
    LookupError, SUMMARY_CONNECTION, SUMMARY_INVALID_PATH, SUMMARY_MISSING_ATTRIBUTE, SUMMARY_NOT_FOUND, SUMMARY_UNSUPPORTED_TYPE,
};
pub use object::ObjectValue;
pub use path::{DocumentPath, PathError, resolve_path};
pub use value::{RawFieldMap, RawValue, RawValueKind, TypeDescriptor, TypedValue};
