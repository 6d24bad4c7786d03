//! Error types for schema loading.

use failure::Fail;

/// An enum of possible errors that can arise while loading a schema document.
///
/// These are load-time failures: any of them aborts
/// [`SchemaStore::load`](../store/struct.SchemaStore.html#method.load), and no
/// validator can be produced from the offending document. Problems found in
/// *instances* are never represented this way; they are reported as
/// [`ValidationError`](../validator/struct.ValidationError.html) records
/// instead.
#[derive(Debug, Fail, PartialEq)]
pub enum SchemaError {
  /// A pointer URI did not lead to a value in the schema document.
  ///
  /// Raised both for URIs that are syntactically malformed and for URIs whose
  /// path walks off the document, such as a missing object member or an
  /// out-of-range array index.
  #[fail(display = "no value at pointer: {}", uri)]
  PointerNotFound { uri: String },

  /// The value at a pointer is neither a boolean nor an object.
  ///
  /// Every schema node is either a boolean (`true` accepts everything,
  /// `false` rejects everything) or an object holding keyword constraints.
  /// Anything else at a position where a schema is expected makes the
  /// document unloadable.
  #[fail(display = "value at {} is not a schema", uri)]
  NotASchema { uri: String },

  /// A `patternProperties` key failed to compile as a pattern.
  #[fail(display = "invalid pattern {:?}: {}", pattern, detail)]
  BadPattern { pattern: String, detail: String },
}
