//! Schema nodes and the values they constrain.

use crate::pattern::Pattern;
use crate::pointer::append;
use crate::store::{SchemaRef, SchemaStore};
use crate::validator::ValidationError;
use crate::vm::Vm;
use failure::Error;
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap};

/// The seven JSON types distinguished by validation.
///
/// Integer-valued numbers are tagged `Integer` and everything else numeric is
/// `Number`; a declared `"type": "number"` accepts both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Type {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
}

impl Type {
    /// Classifies a JSON value.
    pub fn of(value: &Value) -> Type {
        match value {
            Value::Null => Type::Null,
            Value::Bool(_) => Type::Boolean,
            Value::Number(number) => {
                if number.is_i64() || number.is_u64() {
                    Type::Integer
                } else {
                    Type::Number
                }
            }
            Value::String(_) => Type::String,
            Value::Array(_) => Type::Array,
            Value::Object(_) => Type::Object,
        }
    }

    /// Maps a `type` keyword spelling to a tag. Unknown spellings yield
    /// `None`.
    pub fn from_name(name: &str) -> Option<Type> {
        match name {
            "null" => Some(Type::Null),
            "boolean" => Some(Type::Boolean),
            "integer" => Some(Type::Integer),
            "number" => Some(Type::Number),
            "string" => Some(Type::String),
            "array" => Some(Type::Array),
            "object" => Some(Type::Object),
            _ => None,
        }
    }

    /// The keyword spelling of this tag.
    pub fn name(self) -> &'static str {
        match self {
            Type::Null => "null",
            Type::Boolean => "boolean",
            Type::Integer => "integer",
            Type::Number => "number",
            Type::String => "string",
            Type::Array => "array",
            Type::Object => "object",
        }
    }
}

/// `items` in either of its two forms.
#[derive(Debug)]
pub(crate) enum Items {
    /// One schema applied to every element.
    Single(SchemaRef),
    /// Positional schemas; `additionalItems` governs the overflow.
    Tuple(Vec<SchemaRef>),
}

/// One `dependencies` entry.
#[derive(Debug)]
pub(crate) enum Dependency {
    /// Property names that must accompany the key property.
    Keys(Vec<String>),
    /// A schema the whole object must also satisfy.
    Schema(SchemaRef),
}

/// A single schema node: either a bare boolean or a bundle of keyword
/// constraints.
#[derive(Debug)]
pub(crate) enum SchemaNode {
    Boolean(bool),
    Object(Box<ObjectSchema>),
}

/// The keyword constraints of an object-form schema.
///
/// Absent keywords stay `None` (or empty); an absent keyword never constrains
/// anything.
#[derive(Debug, Default)]
pub(crate) struct ObjectSchema {
    pub(crate) types: Option<BTreeSet<Type>>,
    pub(crate) properties: HashMap<String, SchemaRef>,
    pub(crate) pattern_properties: Vec<(Pattern, SchemaRef)>,
    pub(crate) additional_properties: Option<SchemaRef>,
    pub(crate) required: Vec<String>,
    pub(crate) min_properties: Option<u64>,
    pub(crate) max_properties: Option<u64>,
    pub(crate) dependencies: Vec<(String, Dependency)>,
    pub(crate) items: Option<Items>,
    pub(crate) additional_items: Option<SchemaRef>,
    pub(crate) min_items: Option<u64>,
    pub(crate) max_items: Option<u64>,
    pub(crate) contains: Option<SchemaRef>,
    pub(crate) min_length: Option<u64>,
    pub(crate) max_length: Option<u64>,
    pub(crate) minimum: Option<f64>,
    pub(crate) maximum: Option<f64>,
    pub(crate) exclusive_minimum: Option<f64>,
    pub(crate) exclusive_maximum: Option<f64>,
    pub(crate) multiple_of: Option<f64>,
    pub(crate) const_value: Option<Value>,
    pub(crate) enum_values: Option<Vec<Value>>,
    pub(crate) all_of: Option<Vec<SchemaRef>>,
    pub(crate) any_of: Option<Vec<SchemaRef>>,
    pub(crate) one_of: Option<Vec<SchemaRef>>,
    pub(crate) if_: Option<SchemaRef>,
    pub(crate) then_: Option<SchemaRef>,
    pub(crate) else_: Option<SchemaRef>,
    pub(crate) definitions: HashMap<String, SchemaRef>,
}

impl ObjectSchema {
    /// Reads every supported keyword out of `map`, materializing child
    /// schemas through the store. Child URIs are derived with `append`, so
    /// the store's cache keys stay canonical. Unknown keywords are ignored.
    pub(crate) fn build(
        store: &mut SchemaStore,
        map: &Map<String, Value>,
        uri: &str,
    ) -> Result<ObjectSchema, Error> {
        let mut schema = ObjectSchema::default();

        match map.get("type") {
            Some(Value::String(name)) => {
                schema.types = Some(Type::from_name(name).into_iter().collect());
            }
            Some(Value::Array(names)) => {
                schema.types = Some(
                    names
                        .iter()
                        .filter_map(Value::as_str)
                        .filter_map(Type::from_name)
                        .collect(),
                );
            }
            _ => {}
        }

        if let Some(Value::Object(properties)) = map.get("properties") {
            let base = append(uri, "properties");
            for name in properties.keys() {
                let child = store.get(&append(&base, name))?;
                schema.properties.insert(name.clone(), child);
            }
        }

        if let Some(Value::Object(patterns)) = map.get("patternProperties") {
            let base = append(uri, "patternProperties");
            for source in patterns.keys() {
                let pattern = Pattern::new(source)?;
                let child = store.get(&append(&base, source))?;
                schema.pattern_properties.push((pattern, child));
            }
        }

        if map.contains_key("additionalProperties") {
            schema.additional_properties = Some(store.get(&append(uri, "additionalProperties"))?);
        }

        if let Some(Value::Array(names)) = map.get("required") {
            schema.required = names
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect();
        }

        schema.min_properties = map.get("minProperties").and_then(Value::as_u64);
        schema.max_properties = map.get("maxProperties").and_then(Value::as_u64);

        if let Some(Value::Object(dependencies)) = map.get("dependencies") {
            let base = append(uri, "dependencies");
            for (name, entry) in dependencies {
                let dependency = match entry {
                    Value::Array(keys) => Dependency::Keys(
                        keys.iter()
                            .filter_map(Value::as_str)
                            .map(str::to_owned)
                            .collect(),
                    ),
                    _ => Dependency::Schema(store.get(&append(&base, name))?),
                };
                schema.dependencies.push((name.clone(), dependency));
            }
        }

        match map.get("items") {
            Some(Value::Array(entries)) => {
                let base = append(uri, "items");
                let mut tuple = Vec::with_capacity(entries.len());
                for index in 0..entries.len() {
                    tuple.push(store.get(&append(&base, &index.to_string()))?);
                }
                schema.items = Some(Items::Tuple(tuple));
            }
            // A lone boolean here is a subschema, not a flag.
            Some(Value::Object(_)) | Some(Value::Bool(_)) => {
                schema.items = Some(Items::Single(store.get(&append(uri, "items"))?));
            }
            _ => {}
        }

        if map.contains_key("additionalItems") {
            schema.additional_items = Some(store.get(&append(uri, "additionalItems"))?);
        }

        schema.min_items = map.get("minItems").and_then(Value::as_u64);
        schema.max_items = map.get("maxItems").and_then(Value::as_u64);

        if map.contains_key("contains") {
            schema.contains = Some(store.get(&append(uri, "contains"))?);
        }

        schema.min_length = map.get("minLength").and_then(Value::as_u64);
        schema.max_length = map.get("maxLength").and_then(Value::as_u64);

        schema.minimum = map.get("minimum").and_then(Value::as_f64);
        schema.maximum = map.get("maximum").and_then(Value::as_f64);
        schema.exclusive_minimum = map.get("exclusiveMinimum").and_then(Value::as_f64);
        schema.exclusive_maximum = map.get("exclusiveMaximum").and_then(Value::as_f64);
        schema.multiple_of = map.get("multipleOf").and_then(Value::as_f64);

        schema.const_value = map.get("const").cloned();

        if let Some(Value::Array(values)) = map.get("enum") {
            schema.enum_values = Some(values.clone());
        }

        schema.all_of = Self::subschema_list(store, map, uri, "allOf")?;
        schema.any_of = Self::subschema_list(store, map, uri, "anyOf")?;
        schema.one_of = Self::subschema_list(store, map, uri, "oneOf")?;

        if map.contains_key("if") {
            schema.if_ = Some(store.get(&append(uri, "if"))?);
        }
        if map.contains_key("then") {
            schema.then_ = Some(store.get(&append(uri, "then"))?);
        }
        if map.contains_key("else") {
            schema.else_ = Some(store.get(&append(uri, "else"))?);
        }

        if let Some(Value::Object(definitions)) = map.get("definitions") {
            let base = append(uri, "definitions");
            for name in definitions.keys() {
                let child = store.get(&append(&base, name))?;
                schema.definitions.insert(name.clone(), child);
            }
        }

        Ok(schema)
    }

    fn subschema_list(
        store: &mut SchemaStore,
        map: &Map<String, Value>,
        uri: &str,
        keyword: &str,
    ) -> Result<Option<Vec<SchemaRef>>, Error> {
        let entries = match map.get(keyword) {
            Some(Value::Array(entries)) => entries,
            _ => return Ok(None),
        };
        let base = append(uri, keyword);
        let mut list = Vec::with_capacity(entries.len());
        for index in 0..entries.len() {
            list.push(store.get(&append(&base, &index.to_string()))?);
        }
        Ok(Some(list))
    }
}

/// A handle to one schema node within a loaded
/// [`SchemaStore`](../store/struct.SchemaStore.html).
///
/// Handles are cheap to copy and borrow the store, which is immutable once
/// loading is done, so they can be shared freely across threads.
#[derive(Clone, Copy)]
pub struct Schema<'a> {
    store: &'a SchemaStore,
    index: SchemaRef,
}

impl<'a> Schema<'a> {
    pub(crate) fn new(store: &'a SchemaStore, index: SchemaRef) -> Schema<'a> {
        Schema { store, index }
    }

    /// Validates `instance`, reporting errors against the pointer URI `uri`.
    ///
    /// Walks the node's keywords against the instance and pushes one
    /// [`ValidationError`](../validator/struct.ValidationError.html) per
    /// violated constraint into `sink`. The walk never stops early; an
    /// untouched sink after the call means the instance is valid. Callers
    /// starting from the root usually want
    /// [`Validator::validate`](../validator/struct.Validator.html#method.validate),
    /// which supplies `#` and collects into a `Vec`.
    pub fn validate(&self, instance: &Value, uri: &str, sink: &mut dyn FnMut(ValidationError)) {
        Vm { store: self.store }.eval(self.index, instance, uri, sink);
    }

    /// Whether this node is a bare boolean schema.
    pub fn is_boolean(&self) -> bool {
        match self.store.node(self.index) {
            SchemaNode::Boolean(_) => true,
            SchemaNode::Object(_) => false,
        }
    }

    /// Looks up a named subschema under this node's `definitions`.
    ///
    /// Definitions are structural: they never validate on their own. They
    /// are materialized like any other child, though, so a handle fetched
    /// here can be validated against directly.
    pub fn definition(&self, name: &str) -> Option<Schema<'a>> {
        match self.store.node(self.index) {
            SchemaNode::Object(schema) => schema
                .definitions
                .get(name)
                .map(|&index| Schema::new(self.store, index)),
            SchemaNode::Boolean(_) => None,
        }
    }

    /// The store-local reference naming this node.
    pub fn index(&self) -> SchemaRef {
        self.index
    }
}

/// Structural equality for `const` and `enum` comparisons.
///
/// Numbers compare exactly when both sides are integer-tagged and by f64
/// equality otherwise, so `1` equals `1.0` but two distinct large integers
/// never collapse onto the same double. Arrays and objects compare
/// recursively.
pub(crate) fn deep_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(left), Value::Number(right)) => {
            if let (Some(l), Some(r)) = (left.as_i64(), right.as_i64()) {
                l == r
            } else if let (Some(l), Some(r)) = (left.as_u64(), right.as_u64()) {
                l == r
            } else {
                match (left.as_f64(), right.as_f64()) {
                    (Some(l), Some(r)) => l == r,
                    _ => false,
                }
            }
        }
        (Value::Array(left), Value::Array(right)) => {
            left.len() == right.len() && left.iter().zip(right.iter()).all(|(l, r)| deep_eq(l, r))
        }
        (Value::Object(left), Value::Object(right)) => {
            left.len() == right.len()
                && left
                    .iter()
                    .all(|(key, l)| right.get(key).map_or(false, |r| deep_eq(l, r)))
        }
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classification() {
        assert_eq!(Type::of(&json!(null)), Type::Null);
        assert_eq!(Type::of(&json!(true)), Type::Boolean);
        assert_eq!(Type::of(&json!(3)), Type::Integer);
        assert_eq!(Type::of(&json!(-3)), Type::Integer);
        assert_eq!(Type::of(&json!(3.5)), Type::Number);
        assert_eq!(Type::of(&json!(1.0)), Type::Number);
        assert_eq!(Type::of(&json!("s")), Type::String);
        assert_eq!(Type::of(&json!([])), Type::Array);
        assert_eq!(Type::of(&json!({})), Type::Object);
    }

    #[test]
    fn keyword_spellings() {
        assert_eq!(Type::from_name("integer"), Some(Type::Integer));
        assert_eq!(Type::from_name("float"), None);
        for name in &["null", "boolean", "integer", "number", "string", "array", "object"] {
            let tag = Type::from_name(name).unwrap();
            assert_eq!(tag.name(), *name);
        }
    }

    #[test]
    fn integer_equality_is_exact() {
        // Adjacent integers just past 2^53 collide as doubles.
        let a = json!(9007199254740993i64);
        let b = json!(9007199254740992i64);
        assert!(!deep_eq(&a, &b));
        assert!(deep_eq(&a, &a));
    }

    #[test]
    fn mixed_numeric_equality_uses_doubles() {
        assert!(deep_eq(&json!(1), &json!(1.0)));
        assert!(!deep_eq(&json!(1), &json!(1.5)));
        assert!(!deep_eq(&json!("1"), &json!(1)));
    }

    #[test]
    fn containers_compare_structurally() {
        assert!(deep_eq(&json!([1, [2.0]]), &json!([1.0, [2]])));
        assert!(!deep_eq(&json!([1, 2]), &json!([2, 1])));
        assert!(deep_eq(&json!({ "a": 1, "b": 2 }), &json!({ "b": 2, "a": 1 })));
        assert!(!deep_eq(&json!({ "a": 1 }), &json!({ "a": 1, "b": 2 })));
    }
}
