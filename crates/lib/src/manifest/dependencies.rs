//! Dependency extraction.
//!
//! Every `<dependency>` element in the document is a declaration, including
//! those under `<dependencyManagement>`, profiles and plugins.
//!
//! A declaration whose `<exclusions>` list names the declaration's own
//! `groupId`/`artifactId` is skipped as a whole. Build tools normally read an
//! exclusion as removing a transitive dependency instead; the self-veto
//! reading is kept deliberately and recorded as an [`ExclusionRecord`].

use tracing::{debug, info};

use super::{DependencyExtraction, DependencyRef, ExclusionRecord, PropertyMap};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::placeholder::resolve_opt;
use crate::pom::Element;

/// Collect resolved dependencies from a project element.
///
/// `artifactId`, `version` and `scope` are resolved against `properties`;
/// `groupId` is taken as written. Declarations missing any coordinate after
/// resolution are dropped with a [`Diagnostic::MissingField`].
pub fn extract_dependencies(
  project: &Element,
  properties: &PropertyMap,
  diagnostics: &mut Diagnostics,
) -> DependencyExtraction {
  let declarations = project.descendants("dependency");
  let mut extraction = DependencyExtraction {
    declarations: declarations.len(),
    ..Default::default()
  };

  for declaration in declarations {
    let group_id = declaration.child_text("groupId");
    let artifact_id = declaration.child_text("artifactId");

    if let Some(record) = self_exclusion(declaration, group_id, artifact_id) {
      info!(
        group_id = group_id.unwrap_or_default(),
        artifact_id = artifact_id.unwrap_or_default(),
        "dependency excluded"
      );
      extraction.exclusions.push(record);
      extraction.dropped += 1;
      continue;
    }

    let group_id = group_id.map(str::to_string);
    let artifact_id = resolve_opt(artifact_id, properties).map(|r| diagnostics.record(r));
    let version = resolve_opt(declaration.child_text("version"), properties).map(|r| diagnostics.record(r));
    let scope = resolve_opt(declaration.child_text("scope"), properties).map(|r| diagnostics.record(r));

    match (group_id, artifact_id, version) {
      (Some(group_id), Some(artifact_id), Some(version)) => {
        let dependency = DependencyRef {
          group_id,
          artifact_id,
          version,
          scope,
        };
        debug!(dependency = %dependency, "dependency");
        extraction.dependencies.push(dependency);
      }
      (group_id, artifact_id, version) => {
        let missing = [
          ("groupId", group_id.is_none()),
          ("artifactId", artifact_id.is_none()),
          ("version", version.is_none()),
        ]
        .into_iter()
        .filter_map(|(field, absent)| absent.then_some(field))
        .collect();

        diagnostics.push(Diagnostic::MissingField {
          group_id,
          artifact_id,
          version,
          missing,
        });
        extraction.dropped += 1;
      }
    }
  }

  info!(
    accepted = extraction.dependencies.len(),
    dropped = extraction.dropped,
    excluded = extraction.exclusions.len(),
    "extracted dependencies"
  );
  extraction
}

/// Find an exclusion naming the declaring dependency itself.
fn self_exclusion(
  declaration: &Element,
  group_id: Option<&str>,
  artifact_id: Option<&str>,
) -> Option<ExclusionRecord> {
  let exclusions = declaration.child("exclusions")?;

  exclusions
    .children("exclusion")
    .find(|exclusion| exclusion.child_text("groupId") == group_id && exclusion.child_text("artifactId") == artifact_id)
    .map(|_| ExclusionRecord {
      group_id: group_id.map(str::to_string),
      artifact_id: artifact_id.map(str::to_string),
      message: format!(
        "{}:{} excludes itself and was skipped",
        group_id.unwrap_or("N/A"),
        artifact_id.unwrap_or("N/A")
      ),
    })
}
