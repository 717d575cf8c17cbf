//! Declarative data-source schema and request validation.

use docsource_types::{Diagnostic, Diagnostics, LookupError};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map as JsonMap, Value};

/// Value type accepted by an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    String,
    /// Shape only known once the data source has read it.
    Dynamic,
}

/// One attribute of a data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeSchema {
    pub r#type: AttributeType,
    /// Markdown shown to users when documenting the attribute
    pub markdown_description: String,
    /// Must be set in every request
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    /// Filled in by the data source; requests must not set it
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub computed: bool,
    /// Alternative names accepted in requests
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl AttributeSchema {
    pub fn required_string(markdown_description: impl Into<String>) -> Self {
        Self {
            r#type: AttributeType::String,
            markdown_description: markdown_description.into(),
            required: true,
            computed: false,
            aliases: Vec::new(),
        }
    }

    pub fn computed_dynamic(markdown_description: impl Into<String>) -> Self {
        Self {
            r#type: AttributeType::Dynamic,
            markdown_description: markdown_description.into(),
            required: false,
            computed: true,
            aliases: Vec::new(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }
}

/// Attributes of a data source, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub markdown_description: String,
    pub attributes: IndexMap<String, AttributeSchema>,
}

impl Schema {
    pub fn new(markdown_description: impl Into<String>) -> Self {
        Self {
            markdown_description: markdown_description.into(),
            attributes: IndexMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, attribute: AttributeSchema) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    /// Canonical attribute name for `key`, following aliases.
    pub fn canonical_name<'a>(&'a self, key: &str) -> Option<&'a str> {
        self.attributes.iter().find_map(|(name, attribute)| {
            (name == key || attribute.aliases.iter().any(|alias| alias == key)).then_some(name.as_str())
        })
    }

    /// Check a request against the schema.
    ///
    /// Reports unknown and computed attributes, the same attribute given
    /// under two names, missing or null required attributes, and values of
    /// the wrong type.
    pub fn validate_config(&self, config: &JsonMap<String, Value>) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        let mut seen: IndexMap<&str, &str> = IndexMap::new();

        for (key, value) in config {
            let Some(name) = self.canonical_name(key) else {
                diagnostics.push(Diagnostic::error(
                    "Unsupported argument",
                    format!("An argument named \"{key}\" is not expected here."),
                ));
                continue;
            };
            if let Some(previous) = seen.insert(name, key) {
                diagnostics.push(Diagnostic::error(
                    "Conflicting configuration arguments",
                    format!("\"{previous}\" and \"{key}\" both set \"{name}\"; only one may be given."),
                ));
                continue;
            }

            let attribute = &self.attributes[name];
            if attribute.computed {
                diagnostics.push(Diagnostic::error(
                    "Invalid configuration for read-only attribute",
                    format!("Cannot set value for attribute \"{name}\"; it is computed by the data source."),
                ));
                continue;
            }
            if attribute.r#type == AttributeType::String && !matches!(value, Value::String(_) | Value::Null) {
                diagnostics.push(Diagnostic::error(
                    "Incorrect attribute value type",
                    format!("Inappropriate value for attribute \"{name}\": string required."),
                ));
            }
        }

        for (name, attribute) in &self.attributes {
            if !attribute.required {
                continue;
            }
            let provided = seen
                .get(name.as_str())
                .and_then(|key| config.get(*key))
                .is_some_and(|value| !value.is_null());
            if !provided {
                diagnostics.push(LookupError::configuration(name.as_str()).to_diagnostic());
            }
        }

        diagnostics
    }
}
