//! Dynamically shaped object value.

use indexmap::IndexMap;
use serde::{Serialize, Serializer, ser::SerializeMap};
use serde_json::{Map as JsonMap, Value};

use crate::{Diagnostic, Diagnostics, TypeDescriptor, TypedValue};

/// An object whose attribute set and attribute types are only known at read
/// time.
///
/// The value map and the type map always hold the same keys, every type
/// matches the value's own [`TypeDescriptor`], and both are kept sorted by
/// key so that rendering is stable no matter how the store ordered fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectValue {
    attribute_types: IndexMap<String, TypeDescriptor>,
    attributes: IndexMap<String, TypedValue>,
}

impl ObjectValue {
    /// Build an object from a type map and a value map.
    ///
    /// Returns error diagnostics, one per offending key, when the two maps
    /// disagree.
    pub fn new(
        mut attribute_types: IndexMap<String, TypeDescriptor>,
        mut attributes: IndexMap<String, TypedValue>,
    ) -> Result<Self, Diagnostics> {
        let mut diagnostics = Diagnostics::new();

        for (key, value) in &attributes {
            match attribute_types.get(key) {
                None => diagnostics.push(Diagnostic::error(
                    "Extra object attribute value",
                    format!("attribute \"{key}\" has a value but no declared type"),
                )),
                Some(expected) if *expected != value.type_descriptor() => diagnostics.push(Diagnostic::error(
                    "Invalid object attribute type",
                    format!(
                        "attribute \"{key}\" is declared as {expected} but holds a {} value",
                        value.type_descriptor()
                    ),
                )),
                Some(_) => {}
            }
        }
        for key in attribute_types.keys() {
            if !attributes.contains_key(key) {
                diagnostics.push(Diagnostic::error(
                    "Missing object attribute value",
                    format!("attribute \"{key}\" is declared but has no value"),
                ));
            }
        }

        if diagnostics.has_error() {
            return Err(diagnostics);
        }

        attribute_types.sort_keys();
        attributes.sort_keys();
        Ok(Self {
            attribute_types,
            attributes,
        })
    }

    pub fn get(&self, key: &str) -> Option<&TypedValue> {
        self.attributes.get(key)
    }

    pub fn attribute_type(&self, key: &str) -> Option<TypeDescriptor> {
        self.attribute_types.get(key).copied()
    }

    pub fn attributes(&self) -> &IndexMap<String, TypedValue> {
        &self.attributes
    }

    pub fn attribute_types(&self) -> &IndexMap<String, TypeDescriptor> {
        &self.attribute_types
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Attribute values as a plain JSON object.
    pub fn to_json(&self) -> Value {
        let object: JsonMap<String, Value> = self
            .attributes
            .iter()
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect();
        Value::Object(object)
    }

    /// Attribute types as a JSON object of type tags.
    pub fn types_to_json(&self) -> Value {
        let object: JsonMap<String, Value> = self
            .attribute_types
            .iter()
            .map(|(key, descriptor)| (key.clone(), Value::String(descriptor.as_str().to_string())))
            .collect();
        Value::Object(object)
    }
}

impl Serialize for ObjectValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.attributes.len()))?;
        for (key, value) in &self.attributes {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
