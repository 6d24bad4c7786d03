//! `jsv` validates JSON documents against JSON Schemas, using the Draft-07
//! keyword semantics.
//!
//! A schema document is loaded once into a
//! [`SchemaStore`](store/struct.SchemaStore.html), which materializes every
//! subschema reachable from the root and addresses each one by a fragment
//! pointer URI (`#`, `#/properties/age`, `#/definitions/a`, ...). Validation
//! walks the materialized nodes against an instance and reports every
//! violated constraint, each with a pointer to the offending location in the
//! instance.
//!
//! # Validating data
//!
//! ```
//! use serde_json::json;
//! use jsv::{SchemaStore, Validator};
//! use failure::Error;
//!
//! fn main() -> Result<(), Error> {
//!     let mut store = SchemaStore::new();
//!     let schema = store.load(json!({
//!         "type": "object",
//!         "required": ["name"],
//!         "properties": {
//!             "name": { "type": "string", "minLength": 1 },
//!             "age": { "type": "integer", "minimum": 0 },
//!             "phones": {
//!                 "type": "array",
//!                 "items": { "type": "string" }
//!             }
//!         }
//!     }))?;
//!
//!     let validator = Validator::new();
//!
//!     let good = json!({
//!         "name": "John Doe",
//!         "age": 43,
//!         "phones": ["+44 1234567", "+44 2345678"]
//!     });
//!     assert!(validator.validate(store.schema(schema), &good).is_empty());
//!
//!     let bad = json!({
//!         "age": -1,
//!         "phones": ["+44 1234567", 442345678]
//!     });
//!
//!     // Each ValidationError points at the part of the instance that was
//!     // rejected.
//!     let errors = validator.validate(store.schema(schema), &bad);
//!     let paths: Vec<_> = errors.iter().map(|e| e.instance_path()).collect();
//!     assert_eq!(paths, vec!["#/age", "#/phones/1", "#"]);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Errors are data
//!
//! A validation run never fails in the Rust sense: the `Vec` (or sink) of
//! [`ValidationError`](validator/struct.ValidationError.html)s is its result,
//! and an empty list means the instance is valid. Errors carry the instance
//! pointer URI, an [`ErrorKind`](validator/enum.ErrorKind.html) classifying
//! the cause, and an advisory message.
//!
//! Schema *loading* can fail: a pointer that resolves to nothing, a value
//! that is neither boolean nor object, a `patternProperties` key that does
//! not compile. Those surface as
//! [`SchemaError`](errors/enum.SchemaError.html) from
//! [`SchemaStore::load`](store/struct.SchemaStore.html#method.load), and no
//! validator is produced.
//!
//! # Supported keywords
//!
//! `type`, `properties`, `patternProperties`, `additionalProperties`,
//! `required`, `minProperties`, `maxProperties`, `dependencies`, `items`
//! (both forms), `additionalItems`, `minItems`, `maxItems`, `contains`,
//! `minLength`, `maxLength`, `minimum`, `maximum`, `exclusiveMinimum`,
//! `exclusiveMaximum`, `multipleOf`, `const`, `enum`, `allOf`, `anyOf`,
//! `oneOf`, `if`/`then`/`else`, and `definitions`. Unknown keywords
//! (including `$schema` and `$id`) are ignored. `$ref` and `format` are not
//! asserted.

mod vm;

pub mod errors;
pub mod pattern;
pub mod pointer;
pub mod schema;
pub mod store;
pub mod validator;

pub use crate::errors::SchemaError;
pub use crate::pattern::Pattern;
pub use crate::schema::{Schema, Type};
pub use crate::store::{SchemaRef, SchemaStore};
pub use crate::validator::{Config, ErrorKind, ValidationError, Validator};
