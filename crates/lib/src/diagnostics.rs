//! Non-fatal findings collected while resolving a manifest.
//!
//! Nothing here stops a run. Each diagnostic is logged at `warn` level when it
//! is recorded and kept so callers can inspect or print it afterwards.

use std::fmt;

use serde::Serialize;
use tracing::warn;

use crate::placeholder::Resolution;

/// A single warning raised during resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
  /// A `${name}` had no matching property and was left in place.
  UnresolvedPlaceholder { value: String, name: String },

  /// Placeholder substitution did not converge.
  PlaceholderCycle { value: String },

  /// A dependency lacked coordinates after resolution and was dropped.
  MissingField {
    group_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<String>,
    missing: Vec<&'static str>,
  },

  /// A plugin declaration carried exclusions and was not kept.
  PluginExcluded {
    artifact_id: Option<String>,
    version: Option<String>,
  },
}

impl Diagnostic {
  /// Short machine-readable name of the diagnostic kind.
  pub fn kind(&self) -> &'static str {
    match self {
      Diagnostic::UnresolvedPlaceholder { .. } => "unresolved_placeholder",
      Diagnostic::PlaceholderCycle { .. } => "placeholder_cycle",
      Diagnostic::MissingField { .. } => "missing_field",
      Diagnostic::PluginExcluded { .. } => "plugin_excluded",
    }
  }
}

fn or_na(value: &Option<String>) -> &str {
  value.as_deref().unwrap_or("N/A")
}

impl fmt::Display for Diagnostic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Diagnostic::UnresolvedPlaceholder { value, name } => {
        write!(f, "no property '{name}' to resolve '{value}'")
      }
      Diagnostic::PlaceholderCycle { value } => write!(f, "placeholder cycle while resolving '{value}'"),
      Diagnostic::MissingField {
        group_id,
        artifact_id,
        version,
        missing,
      } => write!(
        f,
        "dropped dependency {}:{}:{} (missing {})",
        or_na(group_id),
        or_na(artifact_id),
        or_na(version),
        missing.join(", ")
      ),
      Diagnostic::PluginExcluded { artifact_id, version } => {
        write!(f, "skipped plugin {}:{} (declares exclusions)", or_na(artifact_id), or_na(version))
      }
    }
  }
}

/// Ordered collection of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
  pub fn new() -> Self {
    Self::default()
  }

  /// Record a diagnostic and log it.
  pub fn push(&mut self, diagnostic: Diagnostic) {
    warn!(kind = diagnostic.kind(), "{diagnostic}");
    self.0.push(diagnostic);
  }

  /// Take the value out of a resolution, recording a diagnostic if it is incomplete.
  pub fn record(&mut self, resolution: Resolution) -> String {
    match resolution {
      Resolution::Resolved(value) => value,
      Resolution::Unresolved { value, name } => {
        self.push(Diagnostic::UnresolvedPlaceholder {
          value: value.clone(),
          name,
        });
        value
      }
      Resolution::Cycle { value } => {
        self.push(Diagnostic::PlaceholderCycle { value: value.clone() });
        value
      }
    }
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
    self.0.iter()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// Count diagnostics of the given kind.
  pub fn count_kind(&self, kind: &str) -> usize {
    self.0.iter().filter(|d| d.kind() == kind).count()
  }
}

impl<'a> IntoIterator for &'a Diagnostics {
  type Item = &'a Diagnostic;
  type IntoIter = std::slice::Iter<'a, Diagnostic>;

  fn into_iter(self) -> Self::IntoIter {
    self.0.iter()
  }
}
