//! Property-name pattern matching.

use crate::errors::SchemaError;
use failure::Error;
use regex::Regex;
use std::fmt;

/// A compiled `patternProperties` pattern.
///
/// Matching is unanchored: the pattern matches if it matches anywhere in the
/// property name, per JSON Schema `pattern` semantics.
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compiles a pattern, failing with
    /// [`SchemaError::BadPattern`](../errors/enum.SchemaError.html) on invalid
    /// syntax.
    pub fn new(source: &str) -> Result<Pattern, Error> {
        let regex = Regex::new(source).map_err(|err| SchemaError::BadPattern {
            pattern: source.to_owned(),
            detail: err.to_string(),
        })?;
        Ok(Pattern {
            source: source.to_owned(),
            regex,
        })
    }

    /// Whether the pattern matches anywhere in `text`.
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// The text the pattern was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_are_unanchored() {
        let pattern = Pattern::new("il+").unwrap();
        assert!(pattern.matches("filler"));
        assert!(!pattern.matches("FILLER"));
    }

    #[test]
    fn written_anchors_still_apply() {
        let pattern = Pattern::new("^a").unwrap();
        assert!(pattern.matches("abc"));
        assert!(!pattern.matches("bac"));
    }

    #[test]
    fn bad_patterns_fail_to_compile() {
        assert!(Pattern::new("[unclosed").is_err());
    }
}
