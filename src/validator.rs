//! Validate input data against schemas.
//!
//! This module contains logic related to *validation*, the process of taking a
//! piece of input data (called an "instance") and checking it against a loaded
//! schema.
//!
//! See the docs for [`Validator`](struct.Validator.html) for more.

use crate::schema::Schema;
use serde_json::Value;
use std::fmt;

/// Validates instances against schemas.
#[derive(Debug, Default, Eq, PartialEq, Clone, Hash)]
pub struct Validator {
    config: Config,
}

impl Validator {
    /// Constructs a new validator using the default configuration.
    pub fn new() -> Self {
        Self::new_with_config(Config::default())
    }

    /// Constructs a new validator using a configuration.
    pub fn new_with_config(config: Config) -> Self {
        Self { config }
    }

    /// Validates an instance against a schema, collecting errors into a
    /// `Vec`.
    ///
    /// Despite having "Error" in their name, the records returned here are
    /// not Rust errors. A list of validation errors is the _successful_
    /// result of running `validate`; an empty list means the instance is
    /// valid. Validation starts at the instance root, so every reported
    /// pointer URI begins with `#`.
    pub fn validate(&self, schema: Schema, instance: &Value) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let max_errors = self.config.max_errors;
        schema.validate(instance, "#", &mut |error| {
            if max_errors == 0 || errors.len() < max_errors {
                errors.push(error);
            }
        });
        errors
    }

    /// Validates an instance, pushing every error into a caller-supplied
    /// sink.
    ///
    /// The sink sees errors in the order the walk finds them; a counter, a
    /// first-error latch, or any other policy is just a matter of what the
    /// closure does. [`Config::max_errors`](struct.Config.html#method.max_errors)
    /// is not applied here.
    pub fn validate_with_sink(
        &self,
        schema: Schema,
        instance: &Value,
        sink: &mut dyn FnMut(ValidationError),
    ) {
        schema.validate(instance, "#", sink);
    }
}

/// Configuration for how validation should proceed.
#[derive(Debug, Default, Eq, PartialEq, Clone, Hash)]
pub struct Config {
    max_errors: usize,
}

impl Config {
    /// Create a new, default `Config`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of errors to collect. 0, the default value,
    /// indicates that all errors should be collected.
    ///
    /// If your use-case doesn't care about the full error list, setting this
    /// value to 1 keeps only the first error found.
    pub fn max_errors(&mut self, max_errors: usize) -> &mut Self {
        self.max_errors = max_errors;
        self
    }
}

/// The cause classification of a [`ValidationError`](struct.ValidationError.html).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The instance's type is not among the declared `type` set.
    TypeMismatch,
    /// A numeric bound, length bound, item count, or property count was
    /// violated.
    RangeViolation,
    /// `multipleOf` did not divide the instance.
    MultipleOfViolation,
    /// A `required` property is absent.
    MissingRequired,
    /// A `dependencies` entry named an absent property.
    DependencyUnmet,
    /// No array element satisfied `contains`.
    ContainsUnsatisfied,
    /// The instance does not equal `const`.
    ConstMismatch,
    /// The instance equals no member of `enum`.
    EnumMismatch,
    /// `anyOf`/`oneOf` had no acceptable outcome, or a `false` schema was
    /// applied.
    CombinatorFailure,
}

/// Contains a single problem with an instance when evaluated against a
/// schema.
///
/// Note that, despite its name, `ValidationError` is not an error in the
/// usual Rust sense. It is an ordinary struct carrying a pointer URI into
/// the instance, a cause classification, and an advisory message. Message
/// text is meant for humans and is not part of the crate's stability
/// contract; match on [`kind`](#method.kind) instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    uri: String,
    kind: ErrorKind,
    message: String,
}

impl ValidationError {
    pub(crate) fn new(
        uri: impl Into<String>,
        kind: ErrorKind,
        message: impl Into<String>,
    ) -> ValidationError {
        ValidationError {
            uri: uri.into(),
            kind,
            message: message.into(),
        }
    }

    /// A pointer URI into the part of the instance which was rejected.
    pub fn instance_path(&self) -> &str {
        &self.uri
    }

    /// Why the instance was rejected.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// A human-readable description of the problem.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.uri, self.message)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::store::SchemaStore;
    use serde_json::json;

    fn check(schema: Value, instance: Value) -> Vec<ValidationError> {
        let mut store = SchemaStore::new();
        let root = store.load(schema).expect("schema failed to load");
        Validator::new().validate(store.schema(root), &instance)
    }

    fn paths(errors: &[ValidationError]) -> Vec<&str> {
        errors.iter().map(|error| error.instance_path()).collect()
    }

    #[test]
    fn property_type_mismatch() {
        let schema = json!({ "properties": { "myValue": { "type": "integer" } } });
        let errors = check(schema.clone(), json!({ "myValue": "x" }));
        assert_eq!(paths(&errors), vec!["#/myValue"]);
        assert_eq!(errors[0].kind(), ErrorKind::TypeMismatch);
        assert!(check(schema, json!({ "myValue": 1 })).is_empty());
    }

    #[test]
    fn multiple_of() {
        let schema = json!({ "type": "integer", "multipleOf": 2 });
        let errors = check(schema.clone(), json!(3));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind(), ErrorKind::MultipleOfViolation);
        assert!(check(schema, json!(4)).is_empty());
    }

    #[test]
    fn one_of_rejects_double_matches() {
        let schema = json!({ "oneOf": [{ "type": "integer" }, { "type": "number" }] });
        let errors = check(schema.clone(), json!(1));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind(), ErrorKind::CombinatorFailure);
        assert!(check(schema, json!(1.5)).is_empty());
    }

    #[test]
    fn contains() {
        let schema = json!({ "type": "array", "contains": { "const": 7 } });
        assert!(check(schema.clone(), json!([1, 2, 7])).is_empty());
        let errors = check(schema, json!([1, 2, 3]));
        assert_eq!(paths(&errors), vec!["#"]);
        assert_eq!(errors[0].kind(), ErrorKind::ContainsUnsatisfied);
    }

    #[test]
    fn array_dependencies() {
        let schema = json!({ "dependencies": { "a": ["b"] } });
        let errors = check(schema.clone(), json!({ "a": 1 }));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind(), ErrorKind::DependencyUnmet);
        assert!(check(schema, json!({ "a": 1, "b": 2 })).is_empty());
    }

    #[test]
    fn schema_dependencies_validate_the_whole_object() {
        let schema = json!({ "dependencies": { "a": { "required": ["b"] } } });
        let errors = check(schema.clone(), json!({ "a": 1 }));
        assert_eq!(paths(&errors), vec!["#"]);
        assert_eq!(errors[0].kind(), ErrorKind::MissingRequired);
        assert!(check(schema, json!({ "a": 1, "b": 2 })).is_empty());
    }

    #[test]
    fn conditional_branches() {
        let schema = json!({
            "if": { "properties": { "k": { "const": 1 } }, "required": ["k"] },
            "then": { "required": ["x"] },
            "else": { "required": ["y"] }
        });
        let then_errors = check(schema.clone(), json!({ "k": 1 }));
        assert_eq!(then_errors.len(), 1);
        assert!(then_errors[0].message().contains("x"));
        let else_errors = check(schema, json!({ "k": 2 }));
        assert_eq!(else_errors.len(), 1);
        assert!(else_errors[0].message().contains("y"));
    }

    #[test]
    fn empty_schema_accepts_everything() {
        for instance in vec![json!(null), json!(0), json!("s"), json!([]), json!({})] {
            assert!(check(json!({}), instance).is_empty());
        }
    }

    #[test]
    fn boolean_schemas() {
        for instance in vec![json!(null), json!({ "any": "thing" })] {
            assert!(check(json!(true), instance.clone()).is_empty());
            assert_eq!(check(json!(false), instance).len(), 1);
        }
    }

    #[test]
    fn absent_type_never_mismatches() {
        let schema = json!({ "minimum": 5, "minLength": 2 });
        for instance in vec![json!(null), json!("ab"), json!([]), json!({})] {
            let errors = check(schema.clone(), instance);
            assert!(errors.iter().all(|e| e.kind() != ErrorKind::TypeMismatch));
        }
    }

    #[test]
    fn all_of_concatenates_errors() {
        let schema = json!({
            "allOf": [{ "minimum": 10 }, { "multipleOf": 3 }, { "type": "integer" }]
        });
        let errors = check(schema, json!(4));
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].kind(), ErrorKind::RangeViolation);
        assert_eq!(errors[1].kind(), ErrorKind::MultipleOfViolation);
    }

    #[test]
    fn integers_satisfy_number() {
        assert!(check(json!({ "type": "number" }), json!(3)).is_empty());
        assert!(check(json!({ "type": "integer" }), json!(3)).is_empty());
        assert!(check(json!({ "type": "number" }), json!(3.5)).is_empty());
        assert_eq!(check(json!({ "type": "integer" }), json!(3.5)).len(), 1);
    }

    #[test]
    fn additional_properties_skip_matched_names() {
        let schema = json!({
            "properties": { "a": true },
            "patternProperties": { "^p": true },
            "additionalProperties": false
        });
        let errors = check(schema, json!({ "a": 1, "p9": 2, "stray": 3 }));
        assert_eq!(paths(&errors), vec!["#/stray"]);
    }

    #[test]
    fn validation_is_pure() {
        let schema = json!({
            "type": "object",
            "required": ["a", "b"],
            "properties": { "a": { "type": "string" } }
        });
        let instance = json!({ "a": 3, "c": true });
        let first = check(schema.clone(), instance.clone());
        let second = check(schema, instance);
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn max_errors() {
        let mut config = Config::new();
        config.max_errors(3);

        let mut store = SchemaStore::new();
        let root = store.load(json!({ "items": { "type": "string" } })).unwrap();
        let validator = Validator::new_with_config(config);
        let errors = validator.validate(store.schema(root), &json!([null, null, null, null, null]));
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn sinks_observe_every_error() {
        let mut store = SchemaStore::new();
        let root = store.load(json!({ "required": ["a", "b"] })).unwrap();
        let mut count = 0;
        Validator::new().validate_with_sink(store.schema(root), &json!({}), &mut |_| count += 1);
        assert_eq!(count, 2);
    }
}
