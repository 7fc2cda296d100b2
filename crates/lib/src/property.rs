//! Property storage and `${name}` expansion.
//!
//! Properties are named configuration values loaded from the build
//! description's `[properties]` table. Action and condition fields may
//! reference them with `${name}`, resolved at execution time so that
//! properties written by earlier targets (via `timestamp` or
//! `set-property` actions) are visible to later ones.
//!
//! # Reference Format
//!
//! - `${name}` - the value of property `name`
//! - `$$` - a literal `$`
//!
//! A lone `$` not followed by `{` or `$` passes through unchanged.
//!
//! # Example
//!
//! ```
//! use anvil_lib::property::PropertyStore;
//!
//! let mut props = PropertyStore::new();
//! props.set("build-dir", "build");
//! assert_eq!(props.expand("${build-dir}/out").unwrap(), "build/out");
//! ```

use std::collections::BTreeMap;

use thiserror::Error;

/// A segment of parsed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
  /// Literal text (no property references)
  Literal(String),

  /// A property reference to be resolved
  Property(String),
}

/// Errors that can occur during property parsing or expansion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
  #[error("unclosed property reference at position {0}")]
  Unclosed(usize),

  #[error("empty property reference at position {0}")]
  Empty(usize),

  #[error("undefined property: {0}")]
  Undefined(String),
}

/// Named configuration values, keys unique, last-write-wins.
///
/// Populated once from the build description at load time. Within one
/// invocation the only writers are the `timestamp` and `set-property`
/// actions; readers are condition evaluation and action path resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyStore {
  values: BTreeMap<String, String>,
}

impl PropertyStore {
  /// Create an empty store.
  pub fn new() -> Self {
    Self::default()
  }

  /// Create a store from an existing name/value map.
  pub fn from_map(values: BTreeMap<String, String>) -> Self {
    Self { values }
  }

  /// Look up a property value.
  pub fn get(&self, name: &str) -> Option<&str> {
    self.values.get(name).map(|v| v.as_str())
  }

  /// Returns true iff the property is present with a non-empty value.
  pub fn is_set(&self, name: &str) -> bool {
    self.values.get(name).is_some_and(|v| !v.is_empty())
  }

  /// Set a property value. Last write wins.
  pub fn set(&mut self, name: &str, value: &str) {
    self.values.insert(name.to_string(), value.to_string());
  }

  /// Expand every `${name}` reference in `input` against this store.
  ///
  /// # Errors
  ///
  /// Returns an error if a reference is malformed or names a property
  /// that is not defined.
  pub fn expand(&self, input: &str) -> Result<String, PropertyError> {
    let mut out = String::with_capacity(input.len());
    for segment in parse(input)? {
      match segment {
        Segment::Literal(text) => out.push_str(&text),
        Segment::Property(name) => {
          let value = self
            .values
            .get(&name)
            .ok_or_else(|| PropertyError::Undefined(name.clone()))?;
          out.push_str(value);
        }
      }
    }
    Ok(out)
  }
}

/// Parse a string containing property references into segments.
///
/// # Errors
///
/// Returns an error if a `${` is never closed or a reference is empty.
pub fn parse(input: &str) -> Result<Vec<Segment>, PropertyError> {
  let mut segments = Vec::new();
  let mut literal = String::new();
  let mut chars = input.char_indices().peekable();

  while let Some((pos, ch)) = chars.next() {
    if ch != '$' {
      literal.push(ch);
      continue;
    }

    match chars.peek() {
      Some((_, '$')) => {
        // "$$" escapes to a literal "$"
        chars.next();
        literal.push('$');
      }
      Some((_, '{')) => {
        chars.next();

        if !literal.is_empty() {
          segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }

        let mut name = String::new();
        let mut found_close = false;
        for (_, c) in chars.by_ref() {
          if c == '}' {
            found_close = true;
            break;
          }
          name.push(c);
        }

        if !found_close {
          return Err(PropertyError::Unclosed(pos));
        }
        if name.is_empty() {
          return Err(PropertyError::Empty(pos));
        }

        segments.push(Segment::Property(name));
      }
      _ => {
        // Lone $, passes through (shell variables in messages stay intact)
        literal.push('$');
      }
    }
  }

  if !literal.is_empty() {
    segments.push(Segment::Literal(literal));
  }

  Ok(segments)
}
