//! Manifest resolution.
//!
//! Turns a parsed POM into resolved properties, plugins and dependencies:
//!
//! 1. [`extract_properties`] builds the [`PropertyMap`]
//! 2. [`extract_plugins`] and [`extract_dependencies`] read declarations and
//!    resolve their fields against that map
//!
//! [`resolve_manifest`] runs the whole flow on raw manifest bytes.

mod dependencies;
mod plugins;
mod properties;
mod types;

pub use dependencies::extract_dependencies;
pub use plugins::extract_plugins;
pub use properties::{PROJECT_ARTIFACT_ID, PROJECT_VERSION, extract_properties};
pub use types::*;

use serde::Serialize;
use tracing::info;

use crate::diagnostics::Diagnostics;
use crate::pom::{self, Element, ParseError};

/// Everything resolved from one manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ManifestResolution {
  pub properties: PropertyMap,
  pub plugins: Vec<PluginRef>,
  pub dependencies: Vec<DependencyRef>,
  pub exclusions: Vec<ExclusionRecord>,
  /// Dependency declarations found in the document.
  pub declarations: usize,
  /// Dependency declarations that were excluded or incomplete.
  pub dropped: usize,
  pub diagnostics: Diagnostics,
}

impl ManifestResolution {
  /// Plugins plus accepted dependencies.
  pub fn total(&self) -> usize {
    self.plugins.len() + self.dependencies.len()
  }
}

/// Parse manifest bytes and resolve them.
///
/// # Errors
///
/// Returns [`ParseError`] if the bytes are not a well-formed document. Nothing
/// is resolved in that case.
pub fn resolve_manifest(bytes: &[u8]) -> Result<ManifestResolution, ParseError> {
  let project = pom::parse(bytes)?;
  Ok(resolve_project(&project))
}

/// Resolve an already parsed project element.
pub fn resolve_project(project: &Element) -> ManifestResolution {
  let mut diagnostics = Diagnostics::new();

  let properties = extract_properties(project, &mut diagnostics);
  let plugins = extract_plugins(project, &properties, &mut diagnostics);
  let DependencyExtraction {
    dependencies,
    exclusions,
    declarations,
    dropped,
  } = extract_dependencies(project, &properties, &mut diagnostics);

  info!(
    properties = properties.len(),
    plugins = plugins.len(),
    dependencies = dependencies.len(),
    warnings = diagnostics.len(),
    "resolved manifest"
  );

  ManifestResolution {
    properties,
    plugins,
    dependencies,
    exclusions,
    declarations,
    dropped,
    diagnostics,
  }
}
