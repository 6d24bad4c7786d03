//! Logic related to holding a schema document and its materialized nodes.

use crate::errors::SchemaError;
use crate::pointer;
use crate::schema::{ObjectSchema, Schema, SchemaNode};
use failure::Error;
use serde_json::Value;
use std::collections::HashMap;

/// A reference to one schema node within its [`SchemaStore`](struct.SchemaStore.html).
///
/// References are plain indices: cheap to copy, valid for the lifetime of the
/// load they came from, and identity-comparable. A pointer URI maps to at
/// most one node, so two equal references always name the same node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchemaRef(pub(crate) usize);

/// Owns a schema document and the nodes materialized from it.
///
/// Nodes are constructed during [`load`](#method.load) and addressed by
/// fragment pointer URIs (`#`, `#/definitions/a`, `#/properties/b`, ...).
/// Once `load` returns, the store is never mutated again by validation;
/// shared references to it may drive any number of concurrent `validate`
/// calls, each with its own sink.
///
/// ```
/// use serde_json::json;
/// use jsv::{SchemaStore, Validator};
///
/// # fn main() -> Result<(), failure::Error> {
/// let mut store = SchemaStore::new();
/// let root = store.load(json!({
///     "type": "object",
///     "properties": {
///         "count": { "type": "integer", "minimum": 0 }
///     }
/// }))?;
///
/// let errors = Validator::new().validate(store.schema(root), &json!({ "count": -3 }));
/// assert_eq!(errors.len(), 1);
/// assert_eq!(errors[0].instance_path(), "#/count");
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SchemaStore {
    root: Value,
    cache: HashMap<String, SchemaRef>,
    nodes: Vec<Option<SchemaNode>>,
}

impl SchemaStore {
    /// Constructs a new, empty store.
    pub fn new() -> SchemaStore {
        SchemaStore::default()
    }

    /// Installs `root` as the schema document and materializes every node
    /// reachable from `#`.
    ///
    /// Replaces whatever document was loaded before; references obtained from
    /// an earlier load must not be reused.
    pub fn load(&mut self, root: Value) -> Result<SchemaRef, Error> {
        self.root = root;
        self.cache.clear();
        self.nodes.clear();
        self.get("#")
    }

    /// Returns the node at `uri`, materializing it (and its children) on
    /// first request.
    ///
    /// The cache entry is inserted *before* children are built, so a document
    /// whose keywords lead back to an already-requested URI settles on the
    /// node under construction instead of recursing forever. A failed
    /// materialization is rolled back; requesting the same URI again
    /// re-attempts construction and re-surfaces the failure.
    pub fn get(&mut self, uri: &str) -> Result<SchemaRef, Error> {
        if let Some(&cached) = self.cache.get(uri) {
            return Ok(cached);
        }

        let value = pointer::resolve(&self.root, uri)?.clone();
        let index = SchemaRef(self.nodes.len());
        self.nodes.push(None);
        self.cache.insert(uri.to_owned(), index);

        let node = match self.construct(&value, uri) {
            Ok(node) => node,
            Err(err) => {
                // The URI must not stay cached: a cache hit would hand out
                // a node that was never finished.
                self.cache.remove(uri);
                if index.0 + 1 == self.nodes.len() {
                    self.nodes.pop();
                }
                return Err(err);
            }
        };
        self.nodes[index.0] = Some(node);
        Ok(index)
    }

    fn construct(&mut self, value: &Value, uri: &str) -> Result<SchemaNode, Error> {
        match value {
            Value::Bool(accept) => Ok(SchemaNode::Boolean(*accept)),
            Value::Object(map) => Ok(SchemaNode::Object(Box::new(ObjectSchema::build(
                self, map, uri,
            )?))),
            _ => Err(SchemaError::NotASchema { uri: uri.to_owned() }.into()),
        }
    }

    /// A handle to a previously materialized node.
    pub fn schema(&self, index: SchemaRef) -> Schema {
        Schema::new(self, index)
    }

    /// The schema document this store was loaded from.
    pub fn root(&self) -> &Value {
        &self.root
    }

    pub(crate) fn node(&self, index: SchemaRef) -> &SchemaNode {
        self.nodes[index.0]
            .as_ref()
            .expect("unreachable: schema node requested before construction finished")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn load_materializes_reachable_nodes() {
        let mut store = SchemaStore::new();
        let root = store
            .load(json!({
                "properties": { "a": { "type": "integer" } },
                "definitions": { "b": true }
            }))
            .unwrap();

        let a = store.get("#/properties/a").unwrap();
        let b = store.get("#/definitions/b").unwrap();
        assert_ne!(root, a);
        assert!(store.schema(b).is_boolean());
        assert!(!store.schema(root).is_boolean());
    }

    #[test]
    fn one_node_per_uri() {
        let mut store = SchemaStore::new();
        store.load(json!({ "items": { "minimum": 1 } })).unwrap();
        let first = store.get("#/items").unwrap();
        let second = store.get("#/items").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn definitions_are_reachable() {
        let mut store = SchemaStore::new();
        let root = store
            .load(json!({
                "definitions": { "positive": { "type": "integer", "minimum": 1 } }
            }))
            .unwrap();
        let by_uri = store.get("#/definitions/positive").unwrap();
        let positive = store.schema(root).definition("positive").unwrap();
        assert_eq!(positive.index(), by_uri);
        assert!(store.schema(root).definition("missing").is_none());
    }

    #[test]
    fn boolean_roots_load() {
        let mut store = SchemaStore::new();
        let root = store.load(json!(false)).unwrap();
        assert!(store.schema(root).is_boolean());
    }

    #[test]
    fn rejects_non_schema_values() {
        let mut store = SchemaStore::new();
        let err = store.load(json!(["not", "a", "schema"])).unwrap_err();
        assert_eq!(
            err.downcast::<SchemaError>().unwrap(),
            SchemaError::NotASchema { uri: "#".to_owned() }
        );
    }

    #[test]
    fn rejects_missing_pointers() {
        let mut store = SchemaStore::new();
        store.load(json!({})).unwrap();
        assert!(store.get("#/nothing/here").is_err());
    }

    #[test]
    fn rejects_bad_patterns() {
        let mut store = SchemaStore::new();
        assert!(store
            .load(json!({ "patternProperties": { "[": {} } }))
            .is_err());
    }

    #[test]
    fn failed_loads_leave_no_stale_cache() {
        let mut store = SchemaStore::new();
        assert!(store
            .load(json!({ "properties": { "a": { "patternProperties": { "[": {} } } } }))
            .is_err());
        assert!(store.get("#/properties/a").is_err());
        assert!(store.get("#").is_err());
    }

    #[test]
    fn reload_replaces_the_document() {
        let mut store = SchemaStore::new();
        store.load(json!({ "type": "integer" })).unwrap();
        let root = store.load(json!(true)).unwrap();
        assert!(store.schema(root).is_boolean());
        assert!(store.get("#/type").is_err());
    }
}
