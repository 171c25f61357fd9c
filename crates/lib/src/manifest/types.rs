//! Values produced by manifest resolution.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::placeholder::Lookup;

/// Resolved project properties, keyed by property name.
///
/// Built by [`extract_properties`](super::extract_properties) and then only read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PropertyMap(BTreeMap<String, String>);

impl PropertyMap {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, name: &str) -> Option<&str> {
    self.0.get(name).map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// Properties in name order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }

  pub(crate) fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
    self.0.insert(name.into(), value.into());
  }
}

impl Lookup for PropertyMap {
  fn lookup(&self, name: &str) -> Option<&str> {
    self.get(name)
  }

  fn count(&self) -> usize {
    self.len()
  }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PropertyMap {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
  }
}

/// A build plugin reference.
///
/// Fields the declaration does not provide are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginRef {
  pub artifact_id: Option<String>,
  pub version: Option<String>,
}

impl fmt::Display for PluginRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{}:{}",
      self.artifact_id.as_deref().unwrap_or("N/A"),
      self.version.as_deref().unwrap_or("N/A")
    )
  }
}

/// A fully resolved dependency, ready to be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyRef {
  pub group_id: String,
  pub artifact_id: String,
  pub version: String,
  /// Declared scope, reported but not used for fetching.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub scope: Option<String>,
}

impl DependencyRef {
  pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>, version: impl Into<String>) -> Self {
    Self {
      group_id: group_id.into(),
      artifact_id: artifact_id.into(),
      version: version.into(),
      scope: None,
    }
  }

  /// `groupId:artifactId:version`
  pub fn coordinates(&self) -> String {
    format!("{}:{}:{}", self.group_id, self.artifact_id, self.version)
  }
}

impl fmt::Display for DependencyRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.coordinates())?;
    if let Some(scope) = &self.scope {
      write!(f, " ({scope})")?;
    }
    Ok(())
  }
}

/// Record of a dependency skipped because one of its exclusions names itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExclusionRecord {
  pub group_id: Option<String>,
  pub artifact_id: Option<String>,
  pub message: String,
}

/// Output of [`extract_dependencies`](super::extract_dependencies).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyExtraction {
  /// Accepted dependencies in declaration order.
  pub dependencies: Vec<DependencyRef>,
  /// One record per dependency vetoed by its own exclusion.
  pub exclusions: Vec<ExclusionRecord>,
  /// Number of dependency declarations found.
  pub declarations: usize,
  /// Declarations not accepted, excluded or incomplete.
  pub dropped: usize,
}
