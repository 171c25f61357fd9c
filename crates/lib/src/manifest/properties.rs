//! Project property extraction.

use tracing::{debug, info};

use super::PropertyMap;
use crate::diagnostics::Diagnostics;
use crate::placeholder::resolve;
use crate::pom::Element;

/// Property holding the project's own artifact id.
pub const PROJECT_ARTIFACT_ID: &str = "project.artifactId";

/// Property holding the project version, inherited from the parent when absent.
pub const PROJECT_VERSION: &str = "project.version";

/// Build the property map for a project element.
///
/// Seeds `project.artifactId` and `project.version`, then adds every child of
/// the top-level `<properties>` block in document order. Each value is resolved
/// against the properties accumulated before it.
pub fn extract_properties(project: &Element, diagnostics: &mut Diagnostics) -> PropertyMap {
  let mut properties = PropertyMap::new();

  if let Some(artifact_id) = project.child_text("artifactId") {
    properties.insert(PROJECT_ARTIFACT_ID, artifact_id);
  }

  let version = project
    .child_text("version")
    .or_else(|| project.child("parent").and_then(|parent| parent.child_text("version")));
  if let Some(version) = version {
    properties.insert(PROJECT_VERSION, version);
  }

  if let Some(block) = project.child("properties") {
    for property in block.elements() {
      let value = diagnostics.record(resolve(property.text(), &properties));
      debug!(name = property.name(), value = %value, "property");
      properties.insert(property.name(), value);
    }
  }

  info!(count = properties.len(), "extracted properties");
  properties
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::placeholder::MAX_VALUE_LEN;
  use crate::pom::parse;

  fn extract(doc: &str) -> (PropertyMap, Diagnostics) {
    let project = parse(doc.as_bytes()).unwrap();
    let mut diagnostics = Diagnostics::new();
    let properties = extract_properties(&project, &mut diagnostics);
    (properties, diagnostics)
  }

  #[test]
  fn no_properties_block_yields_project_coordinates_only() {
    let (properties, diagnostics) = extract(
      r#"<project xmlns="http://maven.apache.org/POM/4.0.0">
        <groupId>org.apache.flink</groupId>
        <artifactId>flink-parent</artifactId>
        <version>1.20.1</version>
      </project>"#,
    );

    let expected: PropertyMap = [(PROJECT_ARTIFACT_ID, "flink-parent"), (PROJECT_VERSION, "1.20.1")]
      .into_iter()
      .collect();
    assert_eq!(properties, expected);
    assert!(diagnostics.is_empty());
  }

  #[test]
  fn version_falls_back_to_parent() {
    let (properties, _) = extract(
      r#"<project>
        <parent><artifactId>apache</artifactId><version>23</version></parent>
        <artifactId>child</artifactId>
      </project>"#,
    );
    assert_eq!(properties.get(PROJECT_VERSION), Some("23"));
    assert_eq!(properties.get(PROJECT_ARTIFACT_ID), Some("child"));
  }

  #[test]
  fn empty_document_yields_empty_map() {
    let (properties, _) = extract("<project/>");
    assert!(properties.is_empty());
  }

  #[test]
  fn properties_are_trimmed_and_resolved_in_order() {
    let (properties, diagnostics) = extract(
      r#"<project>
        <artifactId>flink-parent</artifactId>
        <version>1.20.1</version>
        <properties>
          <flink.version>
            ${project.version}
          </flink.version>
          <scala.binary.version>2.12</scala.binary.version>
          <flink.scala.artifact>flink-scala_${scala.binary.version}</flink.scala.artifact>
        </properties>
      </project>"#,
    );

    assert_eq!(properties.get("flink.version"), Some("1.20.1"));
    assert_eq!(properties.get("flink.scala.artifact"), Some("flink-scala_2.12"));
    assert_eq!(properties.len(), 5);
    assert!(diagnostics.is_empty());
  }

  #[test]
  fn forward_reference_stays_verbatim_with_warning() {
    let (properties, diagnostics) = extract(
      r#"<project>
        <properties>
          <a>${b}</a>
          <b>1</b>
        </properties>
      </project>"#,
    );

    assert_eq!(properties.get("a"), Some("${b}"));
    assert_eq!(properties.get("b"), Some("1"));
    assert_eq!(diagnostics.count_kind("unresolved_placeholder"), 1);
  }

  #[test]
  fn self_doubling_property_is_bounded() {
    let fillers: String = (0..20).map(|i| format!("<p{i}>{i}</p{i}>")).collect();
    let doc = format!("<project><properties>{fillers}<a>${{a}}${{a}}</a><b>${{a}}</b></properties></project>");

    let (properties, diagnostics) = extract(&doc);

    assert_eq!(properties.get("a"), Some("${a}${a}"));
    let b = properties.get("b").unwrap();
    assert!(b.len() <= MAX_VALUE_LEN);
    assert_eq!(diagnostics.count_kind("unresolved_placeholder"), 1);
    assert_eq!(diagnostics.count_kind("placeholder_cycle"), 1);
  }

  #[test]
  fn empty_property_is_kept_as_empty_string() {
    let (properties, _) = extract("<project><properties><skip/></properties></project>");
    assert_eq!(properties.get("skip"), Some(""));
  }

  #[test]
  fn namespaced_property_tags_use_local_name() {
    let (properties, _) = extract(
      r#"<m:project xmlns:m="http://maven.apache.org/POM/4.0.0">
        <m:properties><m:java.version>11</m:java.version></m:properties>
      </m:project>"#,
    );
    assert_eq!(properties.get("java.version"), Some("11"));
  }
}
