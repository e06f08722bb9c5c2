//! Generic JSON-to-model mapper.
//!
//! # Design
//! `map` walks a `serde_json::Value` against a `TypeDescriptor` and produces a
//! `Record`: an untyped bag of the fields the descriptor declares, with nested
//! objects already mapped recursively. Typed models are then built from
//! records by `Model::from_record`.
//!
//! The mapper is lenient by construction. It cannot fail:
//! - keys the descriptor does not declare are skipped;
//! - declared keys that are absent stay unset;
//! - a value whose JSON shape does not match the declared kind leaves the
//!   field unset without touching its siblings;
//! - a sequence element that is not a JSON object is dropped.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::schema::{FieldKind, ModelType, ScalarKind, TypeDescriptor};

/// A successfully mapped field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Bool(bool),
    StringList(Vec<String>),
    Object(Record),
    Sequence(Vec<Record>),
}

/// The mapped fields of one domain object, keyed by declared field name.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    model: ModelType,
    fields: BTreeMap<&'static str, FieldValue>,
}

impl Record {
    fn empty(model: ModelType) -> Self {
        Self {
            model,
            fields: BTreeMap::new(),
        }
    }

    pub fn model(&self) -> ModelType {
        self.model
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn take_string(&mut self, name: &str) -> Option<String> {
        match self.fields.remove(name)? {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn take_integer(&mut self, name: &str) -> Option<i64> {
        match self.fields.remove(name)? {
            FieldValue::Integer(n) => Some(n),
            _ => None,
        }
    }

    pub fn take_bool(&mut self, name: &str) -> Option<bool> {
        match self.fields.remove(name)? {
            FieldValue::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn take_string_list(&mut self, name: &str) -> Option<Vec<String>> {
        match self.fields.remove(name)? {
            FieldValue::StringList(list) => Some(list),
            _ => None,
        }
    }

    /// Take a nested object and build it as `T`. `None` if the field is unset
    /// or was mapped as a different type.
    pub fn take_object<T: Model>(&mut self, name: &str) -> Option<T> {
        match self.fields.remove(name)? {
            FieldValue::Object(record) if record.model == T::TYPE => Some(T::from_record(record)),
            _ => None,
        }
    }

    /// Take a nested sequence and build each element as `T`, dropping any
    /// element mapped as a different type.
    pub fn take_sequence<T: Model>(&mut self, name: &str) -> Option<Vec<T>> {
        match self.fields.remove(name)? {
            FieldValue::Sequence(records) => Some(
                records
                    .into_iter()
                    .filter(|r| r.model == T::TYPE)
                    .map(T::from_record)
                    .collect(),
            ),
            _ => None,
        }
    }
}

/// A domain type that can be hydrated from a mapped `Record`.
pub trait Model: Sized {
    const TYPE: ModelType;

    fn from_record(record: Record) -> Self;
}

/// Map `json` into a record of type `target`.
///
/// A non-object root yields an empty record.
pub fn map(json: &Value, target: ModelType) -> Record {
    match json.as_object() {
        Some(object) => map_object(object, target.descriptor()),
        None => Record::empty(target),
    }
}

/// Map `json` straight into the typed model `T`.
pub fn map_model<T: Model>(json: &Value) -> T {
    T::from_record(map(json, T::TYPE))
}

fn map_object(object: &Map<String, Value>, descriptor: &TypeDescriptor) -> Record {
    let mut record = Record::empty(descriptor.model);
    for decl in descriptor.fields {
        let Some(value) = object.get(decl.name) else {
            continue;
        };
        if let Some(mapped) = map_field(value, decl.kind) {
            record.fields.insert(decl.name, mapped);
        }
    }
    record
}

fn map_field(value: &Value, kind: FieldKind) -> Option<FieldValue> {
    match kind {
        FieldKind::Scalar(scalar) => map_scalar(value, scalar),
        FieldKind::Object(model) => {
            let object = value.as_object()?;
            Some(FieldValue::Object(map_object(object, model.descriptor())))
        }
        FieldKind::Sequence(model) => {
            let elements = value.as_array()?;
            let descriptor = model.descriptor();
            let records = elements
                .iter()
                .filter_map(Value::as_object)
                .map(|object| map_object(object, descriptor))
                .collect();
            Some(FieldValue::Sequence(records))
        }
    }
}

fn map_scalar(value: &Value, kind: ScalarKind) -> Option<FieldValue> {
    match kind {
        ScalarKind::String => value.as_str().map(|s| FieldValue::String(s.to_string())),
        ScalarKind::Integer => value.as_i64().map(FieldValue::Integer),
        ScalarKind::Bool => value.as_bool().map(FieldValue::Bool),
        ScalarKind::StringList => {
            let elements = value.as_array()?;
            let strings = elements
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect();
            Some(FieldValue::StringList(strings))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_key_is_ignored_and_known_key_is_kept() {
        let record = map(
            &json!({"id": "x", "unknown": {"a": 1}}),
            ModelType::Venue,
        );
        assert_eq!(record.get("id"), Some(&FieldValue::String("x".to_string())));
        assert!(record.get("unknown").is_none());
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn absent_keys_stay_unset() {
        let record = map(&json!({}), ModelType::Venue);
        assert!(record.is_empty());
        assert_eq!(record.model(), ModelType::Venue);
    }

    #[test]
    fn non_object_root_yields_empty_record() {
        for root in [json!(null), json!(3), json!("venue"), json!([{"id": "a"}])] {
            let record = map(&root, ModelType::Venue);
            assert!(record.is_empty(), "root {root} should map to nothing");
        }
    }

    #[test]
    fn nested_object_is_mapped_recursively() {
        let record = map(
            &json!({"hours": {"status": "Open until 10pm", "isOpen": true, "extra": 1}}),
            ModelType::Venue,
        );
        let Some(FieldValue::Object(hours)) = record.get("hours") else {
            panic!("hours should be an object");
        };
        assert_eq!(hours.model(), ModelType::Hours);
        assert_eq!(hours.get("isOpen"), Some(&FieldValue::Bool(true)));
        assert_eq!(hours.len(), 2);
    }

    #[test]
    fn nested_field_given_non_object_is_unset() {
        let record = map(
            &json!({"id": "v1", "hours": "closed", "location": [1, 2]}),
            ModelType::Venue,
        );
        assert!(record.get("hours").is_none());
        assert!(record.get("location").is_none());
        assert_eq!(record.get("id"), Some(&FieldValue::String("v1".to_string())));
    }

    #[test]
    fn sequence_preserves_order_and_drops_non_objects() {
        let record = map(
            &json!({"items": [
                {"venue": {"id": "a"}},
                "junk",
                7,
                {"venue": {"id": "b"}}
            ]}),
            ModelType::Group,
        );
        let Some(FieldValue::Sequence(items)) = record.get("items") else {
            panic!("items should be a sequence");
        };
        assert_eq!(items.len(), 2);
        let ids: Vec<_> = items
            .iter()
            .map(|item| match item.get("venue") {
                Some(FieldValue::Object(v)) => v.get("id").cloned(),
                _ => None,
            })
            .collect();
        assert_eq!(
            ids,
            vec![
                Some(FieldValue::String("a".to_string())),
                Some(FieldValue::String("b".to_string())),
            ]
        );
    }

    #[test]
    fn sequence_field_given_object_is_unset() {
        let record = map(&json!({"items": {"venue": {}}, "type": "x"}), ModelType::Group);
        assert!(record.get("items").is_none());
        assert_eq!(record.get("type"), Some(&FieldValue::String("x".to_string())));
    }

    #[test]
    fn scalars_are_not_coerced() {
        let record = map(&json!({"status": 5, "isOpen": "true"}), ModelType::Hours);
        assert!(record.is_empty());

        let record = map(&json!({"count": 2.5}), ModelType::Like);
        assert!(record.get("count").is_none());

        let record = map(&json!({"count": 12}), ModelType::Like);
        assert_eq!(record.get("count"), Some(&FieldValue::Integer(12)));
    }

    #[test]
    fn string_list_keeps_only_strings() {
        let record = map(
            &json!({"formattedAddress": ["1 Main St", 3, "Melbourne VIC", null]}),
            ModelType::Location,
        );
        assert_eq!(
            record.get("formattedAddress"),
            Some(&FieldValue::StringList(vec![
                "1 Main St".to_string(),
                "Melbourne VIC".to_string(),
            ]))
        );
    }

    #[test]
    fn take_object_rejects_mismatched_type() {
        let mut record = map(&json!({"likes": {"count": 1}}), ModelType::Tip);
        let wrong: Option<crate::types::Photo> = record.take_object("likes");
        assert!(wrong.is_none());
        assert!(record.get("likes").is_none(), "take removes the field");
    }
}
