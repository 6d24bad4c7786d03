//! Fragment pointer URIs.
//!
//! Schema nodes are addressed by URIs of the form `#/a/b`: a
//! fragment-prefixed RFC 6901 JSON Pointer naming one node within the schema
//! document. [`append`](fn.append.html) derives a child URI from a parent URI
//! and an unescaped segment; [`resolve`](fn.resolve.html) walks a document to
//! the value a URI names.

use crate::errors::SchemaError;
use failure::Error;
use json_pointer::JsonPointer;
use serde_json::Value;

/// Appends one unescaped segment to a pointer URI.
///
/// `~` and `/` inside the segment are escaped per RFC 6901 (`~0` and `~1`),
/// and `%` becomes `%25` so the fragment survives percent-decoding. The
/// segment may be empty: `#/` names the member with key `""`.
pub fn append(uri: &str, segment: &str) -> String {
    let mut out = String::with_capacity(uri.len() + segment.len() + 1);
    out.push_str(uri);
    out.push('/');
    for c in segment.chars() {
        match c {
            '~' => out.push_str("~0"),
            '/' => out.push_str("~1"),
            '%' => out.push_str("%25"),
            _ => out.push(c),
        }
    }
    out
}

/// Resolves a pointer URI against a document.
///
/// Numeric segments index into arrays, all other segments into objects.
/// Fails with [`SchemaError::PointerNotFound`](../errors/enum.SchemaError.html)
/// if the URI is malformed or any segment is missing from the document. `#`
/// resolves to the document itself.
pub fn resolve<'a>(root: &'a Value, uri: &str) -> Result<&'a Value, Error> {
    if uri == "#" {
        return Ok(root);
    }
    let pointer = uri
        .parse::<JsonPointer<String, Vec<String>>>()
        .map_err(|_| SchemaError::PointerNotFound { uri: uri.to_owned() })?;
    pointer
        .get(root)
        .map_err(|_| SchemaError::PointerNotFound { uri: uri.to_owned() }.into())
}
