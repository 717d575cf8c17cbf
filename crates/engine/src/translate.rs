//! Field translation from the store's value universe into typed values.

use docsource_types::{Diagnostics, LookupError, ObjectValue, RawFieldMap, RawValue, TypedValue};
use indexmap::IndexMap;
use tracing::warn;

/// Output of [`translate`]: the typed bag plus whatever went wrong.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Translation {
    pub fields: ObjectValue,
    pub diagnostics: Diagnostics,
}

impl Translation {
    pub fn is_valid(&self) -> bool {
        !self.diagnostics.has_error()
    }
}

/// Map one raw value onto its typed counterpart, if it has one.
///
/// Nulls carry no type on the wire and are inferred as string-null.
pub fn translate_value(value: &RawValue) -> Option<TypedValue> {
    match value {
        RawValue::Bool(value) => Some(TypedValue::Bool(*value)),
        RawValue::String(value) => Some(TypedValue::String(value.clone())),
        RawValue::Integer(value) => Some(TypedValue::Int64(*value)),
        RawValue::Null => Some(TypedValue::string_null()),
        _ => None,
    }
}

/// Translate a fetched field map.
///
/// Each field is handled on its own: supported fields land in the typed bag,
/// every other field is left out and reported as an error diagnostic. The
/// caller decides validity from the diagnostics once all fields are seen.
pub fn translate(raw: RawFieldMap) -> Translation {
    let mut diagnostics = Diagnostics::new();
    let mut types = IndexMap::with_capacity(raw.len());
    let mut values = IndexMap::with_capacity(raw.len());

    for (name, value) in raw {
        match translate_value(&value) {
            Some(typed) => {
                types.insert(name.clone(), typed.type_descriptor());
                values.insert(name, typed);
            }
            None => {
                let kind = value.kind();
                warn!(field = %name, %kind, "skipping field with unsupported type");
                diagnostics.push(LookupError::unsupported_type(name, kind).to_diagnostic());
            }
        }
    }

    match ObjectValue::new(types, values) {
        Ok(fields) => Translation { fields, diagnostics },
        Err(inconsistent) => {
            diagnostics.append(inconsistent);
            Translation {
                fields: ObjectValue::default(),
                diagnostics,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsource_types::{SUMMARY_UNSUPPORTED_TYPE, TypeDescriptor};
    use proptest::prelude::*;

    fn raw(entries: Vec<(&str, RawValue)>) -> RawFieldMap {
        entries.into_iter().map(|(name, value)| (name.to_string(), value)).collect()
    }

    #[test]
    fn translates_supported_scalars() {
        let translation = translate(raw(vec![
            ("key1", RawValue::from("avalue")),
            ("key2", RawValue::from(5_i64)),
            ("key3", RawValue::from(true)),
        ]));

        assert!(translation.diagnostics.is_empty());
        let fields = &translation.fields;
        assert_eq!(fields.get("key1"), Some(&TypedValue::String("avalue".into())));
        assert_eq!(fields.get("key2"), Some(&TypedValue::Int64(5)));
        assert_eq!(fields.get("key3"), Some(&TypedValue::Bool(true)));
        assert_eq!(fields.attribute_type("key1"), Some(TypeDescriptor::String));
        assert_eq!(fields.attribute_type("key2"), Some(TypeDescriptor::Int64));
        assert_eq!(fields.attribute_type("key3"), Some(TypeDescriptor::Bool));
    }

    #[test]
    fn null_becomes_string_null() {
        let translation = translate(raw(vec![("k", RawValue::Null)]));

        assert!(translation.is_valid());
        assert!(translation.diagnostics.is_empty());
        assert_eq!(translation.fields.get("k"), Some(&TypedValue::Null(TypeDescriptor::String)));
        assert_eq!(translation.fields.attribute_type("k"), Some(TypeDescriptor::String));
    }

    #[test]
    fn float_is_rejected_with_one_error() {
        let translation = translate(raw(vec![("k", RawValue::from(1.5))]));

        assert!(!translation.is_valid());
        assert!(!translation.fields.contains_key("k"));
        assert_eq!(translation.diagnostics.len(), 1);
        let diagnostic = translation.diagnostics.iter().next().expect("one diagnostic");
        assert_eq!(diagnostic.summary, SUMMARY_UNSUPPORTED_TYPE);
        assert!(diagnostic.detail.contains("\"k\""));
    }

    #[test]
    fn keeps_translating_after_an_unsupported_field() {
        let translation = translate(raw(vec![
            ("tags", RawValue::Array(vec![RawValue::from("a")])),
            ("name", RawValue::from("alice")),
            ("meta", RawValue::Map(RawFieldMap::new())),
        ]));

        assert_eq!(translation.diagnostics.error_count(), 2);
        assert_eq!(translation.fields.len(), 1);
        assert_eq!(translation.fields.get("name").and_then(TypedValue::as_str), Some("alice"));
    }

    #[test]
    fn translation_ignores_field_order() {
        let entries = vec![
            ("name", RawValue::from("alice")),
            ("age", RawValue::from(30_i64)),
            ("score", RawValue::from(0.5)),
            ("active", RawValue::from(true)),
            ("nickname", RawValue::Null),
        ];
        let mut reversed = entries.clone();
        reversed.reverse();
        let mut rotated = entries.clone();
        rotated.rotate_left(2);

        let expected = translate(raw(entries));
        assert_eq!(translate(raw(reversed)), expected);
        assert_eq!(translate(raw(rotated)), expected);
        assert_eq!(expected.diagnostics.error_count(), 1);
        assert_eq!(
            expected.fields.keys().collect::<Vec<_>>(),
            vec!["active", "age", "name", "nickname"]
        );
    }

    #[test]
    fn empty_document_translates_to_empty_bag() {
        let translation = translate(RawFieldMap::new());
        assert!(translation.fields.is_empty());
        assert!(translation.diagnostics.is_empty());
    }

    fn supported_value() -> impl Strategy<Value = RawValue> {
        prop_oneof![
            Just(RawValue::Null),
            any::<bool>().prop_map(RawValue::Bool),
            any::<i64>().prop_map(RawValue::Integer),
            ".*".prop_map(RawValue::String),
        ]
    }

    fn unsupported_value() -> impl Strategy<Value = RawValue> {
        prop_oneof![
            any::<f64>().prop_map(RawValue::Float),
            proptest::collection::vec(any::<u8>(), 0..8).prop_map(RawValue::Bytes),
            "[a-z/]{1,12}".prop_map(RawValue::Reference),
            (-90.0..90.0f64, -180.0..180.0f64).prop_map(|(latitude, longitude)| RawValue::GeoPoint { latitude, longitude }),
            proptest::collection::vec(supported_value(), 0..4).prop_map(RawValue::Array),
            Just(RawValue::Map(RawFieldMap::new())),
        ]
    }

    fn field_map(values: impl Strategy<Value = RawValue>) -> impl Strategy<Value = RawFieldMap> {
        proptest::collection::btree_map("[a-z][a-z0-9_]{0,8}", values, 0..12)
            .prop_map(|entries| entries.into_iter().collect())
    }

    proptest! {
        #[test]
        fn supported_fields_keep_value_and_type(fields in field_map(supported_value())) {
            let translation = translate(fields.clone());

            prop_assert!(translation.diagnostics.is_empty());
            prop_assert_eq!(translation.fields.len(), fields.len());
            for (name, value) in &fields {
                let typed = translation.fields.get(name).expect("every supported field is kept");
                let descriptor = translation.fields.attribute_type(name).expect("every kept field is typed");
                prop_assert_eq!(descriptor, typed.type_descriptor());
                match value {
                    RawValue::Bool(expected) => prop_assert_eq!(typed.as_bool(), Some(*expected)),
                    RawValue::Integer(expected) => prop_assert_eq!(typed.as_i64(), Some(*expected)),
                    RawValue::String(expected) => prop_assert_eq!(typed.as_str(), Some(expected.as_str())),
                    RawValue::Null => prop_assert_eq!(typed, &TypedValue::string_null()),
                    other => prop_assert!(false, "unexpected {:?}", other.kind()),
                }
            }
        }

        #[test]
        fn unsupported_fields_are_dropped_and_reported(
            supported in field_map(supported_value()),
            unsupported in field_map(unsupported_value()),
        ) {
            let mut fields = supported.clone();
            for (name, value) in &unsupported {
                fields.insert(format!("X-{name}"), value.clone());
            }

            let translation = translate(fields);

            prop_assert_eq!(translation.fields.len(), supported.len());
            prop_assert_eq!(translation.diagnostics.error_count(), unsupported.len());
            prop_assert_eq!(translation.is_valid(), unsupported.is_empty());
            for (name, value) in &unsupported {
                let key = format!("X-{name}");
                prop_assert!(!translation.fields.contains_key(&key));
                prop_assert!(!value.kind().is_supported());
            }
        }
    }
}
