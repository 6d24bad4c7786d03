use crate::pointer::append;
use crate::schema::{deep_eq, Dependency, Items, ObjectSchema, SchemaNode, Type};
use crate::store::{SchemaRef, SchemaStore};
use crate::validator::{ErrorKind, ValidationError};
use serde_json::{Map, Value};
use std::collections::HashSet;

pub(crate) type Sink<'s> = &'s mut dyn FnMut(ValidationError);

pub(crate) struct Vm<'a> {
    pub(crate) store: &'a SchemaStore,
}

impl<'a> Vm<'a> {
    pub(crate) fn eval(&self, schema: SchemaRef, instance: &Value, uri: &str, sink: Sink<'_>) {
        match self.store.node(schema) {
            SchemaNode::Boolean(true) => {}
            SchemaNode::Boolean(false) => sink(ValidationError::new(
                uri,
                ErrorKind::CombinatorFailure,
                "Schema is false",
            )),
            SchemaNode::Object(schema) => self.eval_object(schema, instance, uri, sink),
        }
    }

    fn eval_object(&self, schema: &ObjectSchema, instance: &Value, uri: &str, sink: Sink<'_>) {
        match instance {
            Value::Number(number) => {
                self.type_check(schema, Type::of(instance), uri, sink);
                if let Some(value) = number.as_f64() {
                    self.check_bounds(schema, value, uri, sink);
                }
            }
            Value::Bool(_) => self.type_check(schema, Type::Boolean, uri, sink),
            Value::String(text) => {
                self.type_check(schema, Type::String, uri, sink);
                self.check_string(schema, text, uri, sink);
            }
            Value::Array(elements) => {
                self.type_check(schema, Type::Array, uri, sink);
                self.check_array(schema, elements, uri, sink);
            }
            Value::Object(members) => {
                self.type_check(schema, Type::Object, uri, sink);
                self.check_object(schema, instance, members, uri, sink);
            }
            Value::Null => self.type_check(schema, Type::Null, uri, sink),
        }

        if let Some(expected) = &schema.const_value {
            if !deep_eq(expected, instance) {
                sink(ValidationError::new(
                    uri,
                    ErrorKind::ConstMismatch,
                    "does not equal const",
                ));
            }
        }

        if let Some(allowed) = &schema.enum_values {
            if !allowed.iter().any(|value| deep_eq(value, instance)) {
                sink(ValidationError::new(
                    uri,
                    ErrorKind::EnumMismatch,
                    "not a member of enum",
                ));
            }
        }

        if let Some(condition) = schema.if_ {
            let mut scratch = Vec::new();
            self.eval(condition, instance, uri, &mut |error| scratch.push(error));
            let branch = if scratch.is_empty() {
                schema.then_
            } else {
                schema.else_
            };
            if let Some(branch) = branch {
                self.eval(branch, instance, uri, sink);
            }
        }

        if let Some(subschemas) = &schema.all_of {
            for &subschema in subschemas {
                self.eval(subschema, instance, uri, sink);
            }
        }

        if let Some(subschemas) = &schema.any_of {
            let mut passed = false;
            for &subschema in subschemas {
                let mut scratch = Vec::new();
                self.eval(subschema, instance, uri, &mut |error| scratch.push(error));
                if scratch.is_empty() {
                    passed = true;
                    break;
                }
            }
            if !passed {
                sink(ValidationError::new(
                    uri,
                    ErrorKind::CombinatorFailure,
                    "no subschema in anyOf passed",
                ));
            }
        }

        if let Some(subschemas) = &schema.one_of {
            let mut passed = 0;
            for &subschema in subschemas {
                let mut scratch = Vec::new();
                self.eval(subschema, instance, uri, &mut |error| scratch.push(error));
                if scratch.is_empty() {
                    passed += 1;
                }
            }
            if passed != 1 {
                sink(ValidationError::new(
                    uri,
                    ErrorKind::CombinatorFailure,
                    format!("{} subschemas in oneOf passed, expected exactly one", passed),
                ));
            }
        }
    }

    fn type_check(&self, schema: &ObjectSchema, actual: Type, uri: &str, sink: Sink<'_>) {
        let declared = match &schema.types {
            Some(declared) => declared,
            None => return,
        };

        let accepted = match actual {
            // An integer instance satisfies both "integer" and "number".
            Type::Integer => declared.contains(&Type::Integer) || declared.contains(&Type::Number),
            other => declared.contains(&other),
        };
        if accepted {
            return;
        }

        let names: Vec<&str> = declared.iter().map(|t| t.name()).collect();
        let expected = if names.is_empty() {
            "no known type".to_owned()
        } else {
            names.join(" or ")
        };
        sink(ValidationError::new(
            uri,
            ErrorKind::TypeMismatch,
            format!("expected {}, found {}", expected, actual.name()),
        ));
    }

    fn check_bounds(&self, schema: &ObjectSchema, value: f64, uri: &str, sink: Sink<'_>) {
        if let Some(minimum) = schema.minimum {
            if value < minimum {
                sink(ValidationError::new(
                    uri,
                    ErrorKind::RangeViolation,
                    format!("{} is less than minimum {}", value, minimum),
                ));
            }
        }
        if let Some(bound) = schema.exclusive_minimum {
            if value <= bound {
                sink(ValidationError::new(
                    uri,
                    ErrorKind::RangeViolation,
                    format!("{} is not greater than exclusive minimum {}", value, bound),
                ));
            }
        }
        if let Some(maximum) = schema.maximum {
            if value > maximum {
                sink(ValidationError::new(
                    uri,
                    ErrorKind::RangeViolation,
                    format!("{} is greater than maximum {}", value, maximum),
                ));
            }
        }
        if let Some(bound) = schema.exclusive_maximum {
            if value >= bound {
                sink(ValidationError::new(
                    uri,
                    ErrorKind::RangeViolation,
                    format!("{} is not less than exclusive maximum {}", value, bound),
                ));
            }
        }
        if let Some(multiple) = schema.multiple_of {
            if !is_multiple_of(value, multiple) {
                sink(ValidationError::new(
                    uri,
                    ErrorKind::MultipleOfViolation,
                    format!("{} is not a multiple of {}", value, multiple),
                ));
            }
        }
    }

    fn check_string(&self, schema: &ObjectSchema, text: &str, uri: &str, sink: Sink<'_>) {
        if schema.min_length.is_none() && schema.max_length.is_none() {
            return;
        }
        // Counted in code points, not UTF-8 bytes.
        let length = text.chars().count() as u64;
        if let Some(min) = schema.min_length {
            if length < min {
                sink(ValidationError::new(
                    uri,
                    ErrorKind::RangeViolation,
                    format!("length {} is less than minLength {}", length, min),
                ));
            }
        }
        if let Some(max) = schema.max_length {
            if length > max {
                sink(ValidationError::new(
                    uri,
                    ErrorKind::RangeViolation,
                    format!("length {} is greater than maxLength {}", length, max),
                ));
            }
        }
    }

    fn check_array(&self, schema: &ObjectSchema, elements: &[Value], uri: &str, sink: Sink<'_>) {
        let length = elements.len() as u64;
        if let Some(min) = schema.min_items {
            if length < min {
                sink(ValidationError::new(
                    uri,
                    ErrorKind::RangeViolation,
                    format!("{} items is fewer than minItems {}", length, min),
                ));
            }
        }
        if let Some(max) = schema.max_items {
            if length > max {
                sink(ValidationError::new(
                    uri,
                    ErrorKind::RangeViolation,
                    format!("{} items is more than maxItems {}", length, max),
                ));
            }
        }

        match &schema.items {
            Some(Items::Single(subschema)) => {
                for (index, element) in elements.iter().enumerate() {
                    self.eval(*subschema, element, &append(uri, &index.to_string()), sink);
                }
            }
            Some(Items::Tuple(tuple)) => {
                for (index, element) in elements.iter().enumerate() {
                    let element_uri = append(uri, &index.to_string());
                    if let Some(&subschema) = tuple.get(index) {
                        self.eval(subschema, element, &element_uri, sink);
                    } else if let Some(additional) = schema.additional_items {
                        self.eval(additional, element, &element_uri, sink);
                    }
                }
            }
            None => {}
        }

        if let Some(contains) = schema.contains {
            let satisfied = elements.iter().enumerate().any(|(index, element)| {
                let mut scratch = Vec::new();
                self.eval(
                    contains,
                    element,
                    &append(uri, &index.to_string()),
                    &mut |error| scratch.push(error),
                );
                scratch.is_empty()
            });
            if !satisfied {
                sink(ValidationError::new(
                    uri,
                    ErrorKind::ContainsUnsatisfied,
                    "no element matched contains",
                ));
            }
        }
    }

    fn check_object(
        &self,
        schema: &ObjectSchema,
        instance: &Value,
        members: &Map<String, Value>,
        uri: &str,
        sink: Sink<'_>,
    ) {
        let count = members.len() as u64;
        if let Some(min) = schema.min_properties {
            if count < min {
                sink(ValidationError::new(
                    uri,
                    ErrorKind::RangeViolation,
                    format!("{} properties is fewer than minProperties {}", count, min),
                ));
            }
        }
        if let Some(max) = schema.max_properties {
            if count > max {
                sink(ValidationError::new(
                    uri,
                    ErrorKind::RangeViolation,
                    format!("{} properties is more than maxProperties {}", count, max),
                ));
            }
        }

        // A property consumed by `properties` or any matching pattern is
        // exempt from `additionalProperties`.
        let mut matched = HashSet::new();
        for (name, value) in members {
            let member_uri = append(uri, name);
            if let Some(&subschema) = schema.properties.get(name) {
                self.eval(subschema, value, &member_uri, sink);
                matched.insert(name.as_str());
            }
            for (pattern, subschema) in &schema.pattern_properties {
                if pattern.matches(name) {
                    self.eval(*subschema, value, &member_uri, sink);
                    matched.insert(name.as_str());
                }
            }
        }

        if let Some(additional) = schema.additional_properties {
            for (name, value) in members {
                if !matched.contains(name.as_str()) {
                    self.eval(additional, value, &append(uri, name), sink);
                }
            }
        }

        for name in &schema.required {
            if !members.contains_key(name) {
                sink(ValidationError::new(
                    uri,
                    ErrorKind::MissingRequired,
                    format!("missing required property {:?}", name),
                ));
            }
        }

        for (name, dependency) in &schema.dependencies {
            if !members.contains_key(name) {
                continue;
            }
            match dependency {
                Dependency::Keys(keys) => {
                    for key in keys {
                        if !members.contains_key(key) {
                            sink(ValidationError::new(
                                uri,
                                ErrorKind::DependencyUnmet,
                                format!("property {:?} requires {:?}", name, key),
                            ));
                        }
                    }
                }
                Dependency::Schema(subschema) => self.eval(*subschema, instance, uri, sink),
            }
        }
    }
}

// 2^53: the largest span in which every integer is exactly representable as
// a double.
const EXACT_INT_LIMIT: f64 = 9_007_199_254_740_992.0;

fn is_multiple_of(value: f64, multiple: f64) -> bool {
    if multiple == 0.0 {
        return false;
    }
    if value.fract() == 0.0
        && multiple.fract() == 0.0
        && value.abs() < EXACT_INT_LIMIT
        && multiple.abs() < EXACT_INT_LIMIT
    {
        return (value as i64) % (multiple as i64) == 0;
    }
    let quotient = value / multiple;
    (quotient.round() * multiple - value).abs() <= 1e-10 * value.abs().max(1.0)
}
