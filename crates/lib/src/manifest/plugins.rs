//! Build plugin extraction.

use tracing::{debug, info};

use super::{PluginRef, PropertyMap};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::placeholder::resolve_opt;
use crate::pom::Element;

/// Collect the plugins declared in the project's build sections.
///
/// Plugins are read from `<build><plugins>` and
/// `<build><pluginManagement><plugins>` of the project and of every profile,
/// in document order. Both `artifactId` and `version` are resolved; a missing
/// version falls back to a nested `<parent><version>`. Declarations carrying
/// any `<exclusion>` are skipped, and structurally equal plugins are kept once.
pub fn extract_plugins(project: &Element, properties: &PropertyMap, diagnostics: &mut Diagnostics) -> Vec<PluginRef> {
  let mut plugins: Vec<PluginRef> = Vec::new();

  for declaration in plugin_declarations(project) {
    let artifact_id = resolve_opt(declaration.child_text("artifactId"), properties).map(|r| diagnostics.record(r));
    let version = declaration
      .child_text("version")
      .or_else(|| declaration.child("parent").and_then(|parent| parent.child_text("version")));
    let version = resolve_opt(version, properties).map(|r| diagnostics.record(r));

    let plugin = PluginRef { artifact_id, version };

    if !declaration.descendants("exclusion").is_empty() {
      diagnostics.push(Diagnostic::PluginExcluded {
        artifact_id: plugin.artifact_id,
        version: plugin.version,
      });
      continue;
    }

    if plugins.contains(&plugin) {
      debug!(plugin = %plugin, "duplicate plugin");
      continue;
    }

    debug!(plugin = %plugin, "plugin");
    plugins.push(plugin);
  }

  info!(count = plugins.len(), "extracted plugins");
  plugins
}

/// Plugin declarations of every `<build>` element, in document order.
fn plugin_declarations(project: &Element) -> Vec<&Element> {
  let mut declarations = Vec::new();

  for build in project.descendants("build") {
    for section in build.elements() {
      let plugins = match section.name() {
        "plugins" => Some(section),
        "pluginManagement" => section.child("plugins"),
        _ => None,
      };
      if let Some(plugins) = plugins {
        declarations.extend(plugins.children("plugin"));
      }
    }
  }

  declarations
}
