//! Placeholder parsing and substitution for property references.
//!
//! Manifest values may reference properties with `${name}`. A property value
//! may itself contain placeholders, so substitution runs in passes until the
//! string is free of placeholder syntax.
//!
//! # Placeholder Format
//!
//! A placeholder is `${` followed by the shortest text up to the next `}`.
//! A `${` with no closing brace is plain text, as is a lone `$`.
//!
//! # Passes
//!
//! Each pass scans left to right and replaces every known placeholder. Values
//! inserted during a pass are only looked at again by the next pass. An
//! unknown name ends resolution immediately and leaves its token verbatim.
//!
//! Passes are bounded by the number of properties plus one, and a pass that
//! reproduces an earlier string is reported as a cycle. A value that grows past
//! [`MAX_VALUE_LEN`] is also reported as a cycle, so a property that repeats
//! its own reference cannot blow up exponentially.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use pomfetch_lib::placeholder::{resolve, Resolution};
//!
//! let mut props = HashMap::new();
//! props.insert("flink.version".to_string(), "1.20.1".to_string());
//!
//! assert_eq!(
//!   resolve("flink-core-${flink.version}", &props),
//!   Resolution::Resolved("flink-core-1.20.1".to_string()),
//! );
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use tracing::trace;

/// Longest string a substitution pass may produce.
pub const MAX_VALUE_LEN: usize = 64 * 1024;

/// A segment of parsed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
  /// Literal text (no placeholders)
  Literal(String),

  /// `${name}` - reference to a property
  Placeholder(String),
}

impl fmt::Display for Segment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Segment::Literal(s) => f.write_str(s),
      Segment::Placeholder(name) => write!(f, "${{{name}}}"),
    }
  }
}

/// Outcome of resolving one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
  /// Every placeholder was substituted.
  Resolved(String),

  /// `name` has no property; `value` keeps `${name}` verbatim.
  Unresolved { value: String, name: String },

  /// Substitution kept producing placeholders or grew past [`MAX_VALUE_LEN`];
  /// `value` is the last pass.
  Cycle { value: String },
}

impl Resolution {
  /// The value after resolution, resolved or not.
  pub fn value(&self) -> &str {
    match self {
      Resolution::Resolved(value) => value,
      Resolution::Unresolved { value, .. } | Resolution::Cycle { value } => value,
    }
  }

  pub fn into_value(self) -> String {
    match self {
      Resolution::Resolved(value) => value,
      Resolution::Unresolved { value, .. } | Resolution::Cycle { value } => value,
    }
  }
}

/// Source of property values for substitution.
pub trait Lookup {
  /// Value of the named property, if defined.
  fn lookup(&self, name: &str) -> Option<&str>;

  /// Number of defined properties; bounds the number of passes.
  fn count(&self) -> usize;
}

impl Lookup for HashMap<String, String> {
  fn lookup(&self, name: &str) -> Option<&str> {
    self.get(name).map(String::as_str)
  }

  fn count(&self) -> usize {
    self.len()
  }
}

impl Lookup for BTreeMap<String, String> {
  fn lookup(&self, name: &str) -> Option<&str> {
    self.get(name).map(String::as_str)
  }

  fn count(&self) -> usize {
    self.len()
  }
}

/// Parse a string into literal and placeholder segments.
///
/// Rendering the segments back with [`Segment`]'s `Display` reproduces the input.
pub fn parse(input: &str) -> Vec<Segment> {
  let mut segments = Vec::new();
  let mut rest = input;

  while let Some(start) = rest.find("${") {
    let after = &rest[start + 2..];
    let Some(end) = after.find('}') else {
      break;
    };

    if start > 0 {
      segments.push(Segment::Literal(rest[..start].to_string()));
    }
    segments.push(Segment::Placeholder(after[..end].to_string()));
    rest = &after[end + 1..];
  }

  if !rest.is_empty() {
    segments.push(Segment::Literal(rest.to_string()));
  }

  segments
}

/// Check whether a string contains placeholder syntax.
pub fn has_placeholders(input: &str) -> bool {
  input
    .find("${")
    .is_some_and(|start| input[start + 2..].contains('}'))
}

/// Resolve every placeholder in `input` against `properties`.
///
/// Strings without placeholder syntax come back unchanged as
/// [`Resolution::Resolved`], which makes resolution idempotent.
pub fn resolve(input: &str, properties: &impl Lookup) -> Resolution {
  if !has_placeholders(input) {
    return Resolution::Resolved(input.to_string());
  }

  let max_passes = properties.count() + 1;
  let mut seen = HashSet::new();
  let mut current = input.to_string();

  for pass in 0..max_passes {
    let next = match substitute_pass(&current, properties) {
      Ok(next) => next,
      Err(stopped) => return stopped,
    };
    trace!(pass, from = %current, to = %next, "substituted placeholders");

    if !has_placeholders(&next) {
      return Resolution::Resolved(next);
    }

    seen.insert(current);
    if seen.contains(&next) {
      return Resolution::Cycle { value: next };
    }
    current = next;
  }

  Resolution::Cycle { value: current }
}

/// Resolve an optional value. Absent values stay absent.
pub fn resolve_opt(input: Option<&str>, properties: &impl Lookup) -> Option<Resolution> {
  input.map(|value| resolve(value, properties))
}

/// Run one left-to-right pass over `input`.
///
/// Fails with [`Resolution::Cycle`] holding `input` as soon as the result
/// exceeds [`MAX_VALUE_LEN`].
fn substitute_pass(input: &str, properties: &impl Lookup) -> Result<String, Resolution> {
  let segments = parse(input);
  let mut result = String::with_capacity(input.len());
  let mut iter = segments.iter();

  while let Some(segment) = iter.next() {
    match segment {
      Segment::Literal(s) => result.push_str(s),
      Segment::Placeholder(name) => match properties.lookup(name) {
        Some(value) => result.push_str(value),
        None => {
          result.push_str(&segment.to_string());
          for rest in iter.by_ref() {
            result.push_str(&rest.to_string());
          }
          return Err(Resolution::Unresolved {
            value: result,
            name: name.clone(),
          });
        }
      },
    }

    if result.len() > MAX_VALUE_LEN {
      return Err(Resolution::Cycle {
        value: input.to_string(),
      });
    }
  }

  Ok(result)
}
