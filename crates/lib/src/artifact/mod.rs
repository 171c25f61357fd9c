//! Artifact location and download.
//!
//! A dependency `org.apache.flink:flink-core:1.20.1` lives at
//! `org/apache/flink/flink-core/1.20.1/flink-core-1.20.1.{ext}` both in the
//! remote repository and under the local download root.

mod materialize;

pub use materialize::{FailedArtifact, MaterializeError, MaterializeReport, StoredArtifact, materialize};

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::manifest::DependencyRef;

/// File kinds tried for every dependency, in fetch order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactExtension {
  Pom,
  Jar,
  Aar,
  Module,
}

impl ArtifactExtension {
  pub const ALL: [ArtifactExtension; 4] = [
    ArtifactExtension::Pom,
    ArtifactExtension::Jar,
    ArtifactExtension::Aar,
    ArtifactExtension::Module,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      ArtifactExtension::Pom => "pom",
      ArtifactExtension::Jar => "jar",
      ArtifactExtension::Aar => "aar",
      ArtifactExtension::Module => "module",
    }
  }
}

impl fmt::Display for ArtifactExtension {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// `groupId` with dots turned into path separators.
pub fn group_path(group_id: &str) -> String {
  group_id.replace('.', "/")
}

/// Repository-relative path without extension:
/// `{group-path}/{artifactId}/{version}/{artifactId}-{version}`.
pub fn artifact_path(dependency: &DependencyRef) -> String {
  format!(
    "{}/{}/{}/{}-{}",
    group_path(&dependency.group_id),
    dependency.artifact_id,
    dependency.version,
    dependency.artifact_id,
    dependency.version
  )
}

/// Remote URL of one artifact file. A trailing `/` on `repository_url` is ignored.
pub fn remote_url(repository_url: &str, dependency: &DependencyRef, extension: ArtifactExtension) -> String {
  format!(
    "{}/{}.{}",
    repository_url.trim_end_matches('/'),
    artifact_path(dependency),
    extension
  )
}

/// Local path of one artifact file below `download_root`.
pub fn local_path(download_root: &Path, dependency: &DependencyRef, extension: ArtifactExtension) -> PathBuf {
  let mut path = download_root.to_path_buf();
  path.extend(dependency.group_id.split('.'));
  path.push(&dependency.artifact_id);
  path.push(&dependency.version);
  path.push(format!("{}-{}.{}", dependency.artifact_id, dependency.version, extension));
  path
}

/// Whether every coordinate is usable as a single path component.
pub(crate) fn has_safe_components(dependency: &DependencyRef) -> bool {
  let safe = |part: &str| !part.is_empty() && part != "." && part != ".." && !part.contains(['/', '\\']);
  dependency.group_id.split('.').all(safe) && safe(&dependency.artifact_id) && safe(&dependency.version)
}
