//! End-to-end runs: obtain the manifest, resolve it, optionally download.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::Result;
use crate::artifact::{MaterializeReport, materialize};
use crate::fetch::{Fetch, Store};
use crate::manifest::{ManifestResolution, resolve_manifest};
use crate::source::ManifestSource;

/// Everything a run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
  /// URL or path the manifest came from.
  pub source: String,
  pub resolution: ManifestResolution,
  /// Present when artifacts were downloaded.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub materialized: Option<MaterializeReport>,
}

/// Load and resolve a manifest without downloading artifacts.
pub fn resolve(source: &ManifestSource, fetcher: &impl Fetch, store: &impl Store) -> Result<RunReport> {
  let bytes = source.load(fetcher, store)?;
  let resolution = resolve_manifest(&bytes)?;

  Ok(RunReport {
    source: source.to_string(),
    resolution,
    materialized: None,
  })
}

/// Load and resolve a manifest, then download every resolved dependency.
pub fn fetch(
  source: &ManifestSource,
  repository_url: &str,
  download_root: &Path,
  fetcher: &impl Fetch,
  store: &impl Store,
) -> Result<RunReport> {
  let mut report = resolve(source, fetcher, store)?;
  info!(
    plugins = report.resolution.plugins.len(),
    dependencies = report.resolution.dependencies.len(),
    "resolution complete"
  );

  let materialized = materialize(
    repository_url,
    download_root,
    &report.resolution.dependencies,
    fetcher,
    store,
  )?;
  report.materialized = Some(materialized);
  Ok(report)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Error;
  use crate::fetch::{FetchError, FsStore, StoreError};
  use std::collections::HashMap;
  use std::io;
  use tempfile::TempDir;

  struct MapFetcher(HashMap<String, &'static str>);

  impl Fetch for MapFetcher {
    fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
      self
        .0
        .get(url)
        .map(|body| body.as_bytes().to_vec())
        .ok_or_else(|| FetchError::Status {
          url: url.to_string(),
          status: 404,
        })
    }
  }

  const MANIFEST_URL: &str = "https://repo.example/maven2/com/acme/app/1.0/app-1.0.pom";
  const REPO: &str = "https://repo.example/maven2";

  const MANIFEST: &str = r#"<project>
  <artifactId>app</artifactId>
  <version>1.0</version>
  <properties><lib.version>2.1</lib.version></properties>
  <dependencies>
    <dependency><groupId>com.acme</groupId><artifactId>lib</artifactId><version>${lib.version}</version></dependency>
    <dependency><groupId>com.acme</groupId><artifactId>gone</artifactId><version>1</version>
      <exclusions><exclusion><groupId>com.acme</groupId><artifactId>gone</artifactId></exclusion></exclusions>
    </dependency>
  </dependencies>
</project>"#;

  fn fetcher() -> MapFetcher {
    MapFetcher(HashMap::from([
      (MANIFEST_URL.to_string(), MANIFEST),
      (format!("{REPO}/com/acme/lib/2.1/lib-2.1.pom"), "<project/>"),
      (format!("{REPO}/com/acme/lib/2.1/lib-2.1.jar"), "PK"),
    ]))
  }

  #[test]
  fn fetch_resolves_and_downloads() {
    let temp = TempDir::new().unwrap();
    let source = ManifestSource::Remote {
      url: MANIFEST_URL.to_string(),
      cache: temp.path().join("cache/app-1.0.pom"),
    };
    let root = temp.path().join("repo");

    let report = fetch(&source, REPO, &root, &fetcher(), &FsStore).unwrap();

    assert_eq!(report.source, MANIFEST_URL);
    assert_eq!(report.resolution.dependencies.len(), 1);
    assert_eq!(report.resolution.exclusions.len(), 1);

    let materialized = report.materialized.unwrap();
    assert_eq!(materialized.stored.len(), 2);
    assert_eq!(materialized.failed.len(), 2);
    assert!(root.join("com/acme/lib/2.1/lib-2.1.jar").is_file());
    assert!(!root.join("com/acme/gone").exists());
    assert!(temp.path().join("cache/app-1.0.pom").is_file());
  }

  #[test]
  fn resolve_does_not_download_artifacts() {
    let temp = TempDir::new().unwrap();
    let source = ManifestSource::Remote {
      url: MANIFEST_URL.to_string(),
      cache: temp.path().join("app-1.0.pom"),
    };

    let report = resolve(&source, &fetcher(), &FsStore).unwrap();

    assert!(report.materialized.is_none());
    assert_eq!(report.resolution.properties.get("lib.version"), Some("2.1"));
  }

  #[test]
  fn unparseable_manifest_aborts_before_download() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("pom.xml");
    std::fs::write(&path, "<project><version>1</project>").unwrap();
    let root = temp.path().join("repo");

    let result = fetch(&ManifestSource::Local(path), REPO, &root, &fetcher(), &FsStore);

    assert!(matches!(result, Err(Error::Parse(_))));
    assert!(!root.exists());
  }

  struct ReadOnlyStore;

  impl Store for ReadOnlyStore {
    fn create_dir_all(&self, path: &Path) -> std::result::Result<(), StoreError> {
      Err(StoreError::CreateDir {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
      })
    }

    fn store(&self, path: &Path, _bytes: &[u8]) -> std::result::Result<(), StoreError> {
      Err(StoreError::Write {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
      })
    }
  }

  #[test]
  fn unwritable_download_root_aborts_after_resolution() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("pom.xml");
    std::fs::write(&path, MANIFEST).unwrap();

    let result = fetch(
      &ManifestSource::Local(path),
      REPO,
      &temp.path().join("repo"),
      &fetcher(),
      &ReadOnlyStore,
    );

    assert!(matches!(result, Err(Error::Materialize(_))));
  }

  #[test]
  fn manifest_download_failure_aborts() {
    let temp = TempDir::new().unwrap();
    let source = ManifestSource::Remote {
      url: format!("{REPO}/missing.pom"),
      cache: temp.path().join("missing.pom"),
    };

    let result = resolve(&source, &fetcher(), &FsStore);
    assert!(matches!(result, Err(Error::Source(_))));
  }
}
