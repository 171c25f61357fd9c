//! Sequential download of resolved dependencies.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::{ArtifactExtension, has_safe_components, local_path, remote_url};
use crate::fetch::{Fetch, Store, StoreError};
use crate::manifest::DependencyRef;

/// An artifact file written to the download root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredArtifact {
  pub coordinates: String,
  pub extension: ArtifactExtension,
  pub path: PathBuf,
  pub size: usize,
}

/// An artifact file that could not be fetched or written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedArtifact {
  pub coordinates: String,
  pub extension: ArtifactExtension,
  pub url: String,
  pub reason: String,
}

/// Outcome of a materialization sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MaterializeReport {
  pub stored: Vec<StoredArtifact>,
  pub failed: Vec<FailedArtifact>,
  /// Dependencies skipped because the same coordinates were already swept.
  pub duplicates: usize,
}

/// Errors that stop materialization before any fetch.
#[derive(Debug, Error)]
pub enum MaterializeError {
  #[error("failed to prepare download root: {0}")]
  DownloadRoot(#[source] StoreError),
}

/// Fetch every candidate file of every dependency into `download_root`.
///
/// The download root is created first; failing that is the only fatal error.
/// Each dependency is then tried with every [`ArtifactExtension`] in order.
/// A failed fetch or write is recorded in the report and the sweep continues.
/// Dependencies repeating earlier coordinates are swept once.
pub fn materialize(
  repository_url: &str,
  download_root: &Path,
  dependencies: &[DependencyRef],
  fetcher: &impl Fetch,
  store: &impl Store,
) -> Result<MaterializeReport, MaterializeError> {
  store
    .create_dir_all(download_root)
    .map_err(MaterializeError::DownloadRoot)?;

  info!(
    dependencies = dependencies.len(),
    repository = %repository_url,
    root = %download_root.display(),
    "materializing artifacts"
  );

  let mut report = MaterializeReport::default();
  let mut seen = HashSet::new();

  for dependency in dependencies {
    let key = (
      dependency.group_id.as_str(),
      dependency.artifact_id.as_str(),
      dependency.version.as_str(),
    );
    if !seen.insert(key) {
      debug!(dependency = %dependency.coordinates(), "already swept");
      report.duplicates += 1;
      continue;
    }

    let safe = has_safe_components(dependency);

    for extension in ArtifactExtension::ALL {
      let url = remote_url(repository_url, dependency, extension);

      let outcome = if safe {
        fetch_one(&url, download_root, dependency, extension, fetcher, store)
      } else {
        Err("coordinates are not valid path components".to_string())
      };

      match outcome {
        Ok(stored) => {
          info!(path = %stored.path.display(), size = stored.size, "stored artifact");
          report.stored.push(stored);
        }
        Err(reason) => {
          warn!(url = %url, reason = %reason, "skipping artifact");
          report.failed.push(FailedArtifact {
            coordinates: dependency.coordinates(),
            extension,
            url,
            reason,
          });
        }
      }
    }
  }

  info!(
    stored = report.stored.len(),
    failed = report.failed.len(),
    "materialization finished"
  );
  Ok(report)
}

fn fetch_one(
  url: &str,
  download_root: &Path,
  dependency: &DependencyRef,
  extension: ArtifactExtension,
  fetcher: &impl Fetch,
  store: &impl Store,
) -> Result<StoredArtifact, String> {
  let bytes = fetcher.fetch(url).map_err(|e| e.to_string())?;
  let path = local_path(download_root, dependency, extension);
  store.store(&path, &bytes).map_err(|e| e.to_string())?;

  Ok(StoredArtifact {
    coordinates: dependency.coordinates(),
    extension,
    path,
    size: bytes.len(),
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::fetch::{FetchError, FsStore};
  use std::cell::RefCell;
  use std::collections::HashMap;
  use std::io;
  use tempfile::TempDir;

  // ==========================================================================
  // Test Doubles
  // ==========================================================================

  /// Serves a fixed set of URLs and records every request.
  #[derive(Default)]
  struct TestFetcher {
    bodies: HashMap<String, Vec<u8>>,
    requests: RefCell<Vec<String>>,
  }

  impl TestFetcher {
    fn with(mut self, url: &str, body: &str) -> Self {
      self.bodies.insert(url.to_string(), body.as_bytes().to_vec());
      self
    }

    fn requests(&self) -> Vec<String> {
      self.requests.borrow().clone()
    }
  }

  impl Fetch for TestFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
      self.requests.borrow_mut().push(url.to_string());
      self.bodies.get(url).cloned().ok_or_else(|| FetchError::Status {
        url: url.to_string(),
        status: 404,
      })
    }
  }

  /// Keeps stored files in memory.
  #[derive(Default)]
  struct MemoryStore {
    files: RefCell<HashMap<PathBuf, Vec<u8>>>,
    fail_root: bool,
  }

  impl Store for MemoryStore {
    fn create_dir_all(&self, path: &Path) -> Result<(), StoreError> {
      if self.fail_root {
        return Err(StoreError::CreateDir {
          path: path.to_path_buf(),
          source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
        });
      }
      Ok(())
    }

    fn store(&self, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
      self.files.borrow_mut().insert(path.to_path_buf(), bytes.to_vec());
      Ok(())
    }
  }

  const REPO: &str = "https://repo.example/maven2";

  fn url(path: &str) -> String {
    format!("{REPO}/{path}")
  }

  // ==========================================================================
  // Sweep Behavior
  // ==========================================================================

  #[test]
  fn failed_extension_does_not_stop_the_sweep() {
    let fetcher = TestFetcher::default()
      .with(&url("com/foo/bar/1.0/bar-1.0.pom"), "pom")
      .with(&url("com/foo/bar/1.0/bar-1.0.jar"), "jar")
      .with(&url("com/foo/baz/2.0/baz-2.0.pom"), "pom");
    let store = MemoryStore::default();
    let deps = vec![
      DependencyRef::new("com.foo", "bar", "1.0"),
      DependencyRef::new("com.foo", "baz", "2.0"),
    ];

    let report = materialize(REPO, Path::new("/dl"), &deps, &fetcher, &store).unwrap();

    let bar_stored: Vec<_> = report
      .stored
      .iter()
      .filter(|s| s.coordinates == "com.foo:bar:1.0")
      .map(|s| s.extension)
      .collect();
    assert_eq!(bar_stored, vec![ArtifactExtension::Pom, ArtifactExtension::Jar]);

    assert!(
      report
        .failed
        .iter()
        .any(|f| f.coordinates == "com.foo:bar:1.0" && f.extension == ArtifactExtension::Aar)
    );
    // The second dependency is still processed.
    assert!(report.stored.iter().any(|s| s.coordinates == "com.foo:baz:2.0"));
    assert_eq!(store.files.borrow().len(), 3);
    assert_eq!(fetcher.requests().len(), 8);
  }

  #[test]
  fn fetches_in_extension_order() {
    let fetcher = TestFetcher::default();
    let store = MemoryStore::default();
    let deps = vec![DependencyRef::new("org.example", "lib", "1")];

    materialize(REPO, Path::new("/dl"), &deps, &fetcher, &store).unwrap();

    assert_eq!(
      fetcher.requests(),
      vec![
        url("org/example/lib/1/lib-1.pom"),
        url("org/example/lib/1/lib-1.jar"),
        url("org/example/lib/1/lib-1.aar"),
        url("org/example/lib/1/lib-1.module"),
      ]
    );
  }

  #[test]
  fn download_root_failure_is_fatal() {
    let fetcher = TestFetcher::default();
    let store = MemoryStore {
      fail_root: true,
      ..Default::default()
    };
    let deps = vec![DependencyRef::new("org.example", "lib", "1")];

    let result = materialize(REPO, Path::new("/dl"), &deps, &fetcher, &store);

    assert!(matches!(result, Err(MaterializeError::DownloadRoot(_))));
    assert!(fetcher.requests().is_empty());
  }

  #[test]
  fn repeated_coordinates_are_swept_once() {
    let fetcher = TestFetcher::default();
    let store = MemoryStore::default();
    let mut scoped = DependencyRef::new("org.example", "lib", "1");
    scoped.scope = Some("test".to_string());
    let deps = vec![DependencyRef::new("org.example", "lib", "1"), scoped];

    let report = materialize(REPO, Path::new("/dl"), &deps, &fetcher, &store).unwrap();

    assert_eq!(report.duplicates, 1);
    assert_eq!(fetcher.requests().len(), 4);
  }

  #[test]
  fn unsafe_coordinates_are_reported_without_fetching() {
    let fetcher = TestFetcher::default();
    let store = MemoryStore::default();
    let deps = vec![DependencyRef::new("org.example", "../../etc", "1")];

    let report = materialize(REPO, Path::new("/dl"), &deps, &fetcher, &store).unwrap();

    assert_eq!(report.failed.len(), 4);
    assert!(fetcher.requests().is_empty());
  }

  #[test]
  fn writes_repository_layout_to_disk() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("repository");
    let fetcher = TestFetcher::default()
      .with(&url("org/apache/flink/flink-core/1.20.1/flink-core-1.20.1.pom"), "<project/>")
      .with(&url("org/apache/flink/flink-core/1.20.1/flink-core-1.20.1.jar"), "PK");
    let deps = vec![DependencyRef::new("org.apache.flink", "flink-core", "1.20.1")];

    let report = materialize(REPO, &root, &deps, &fetcher, &FsStore).unwrap();

    let version_dir = root.join("org/apache/flink/flink-core/1.20.1");
    assert_eq!(
      std::fs::read_to_string(version_dir.join("flink-core-1.20.1.pom")).unwrap(),
      "<project/>"
    );
    assert_eq!(std::fs::read(version_dir.join("flink-core-1.20.1.jar")).unwrap(), b"PK");
    assert!(!version_dir.join("flink-core-1.20.1.aar").exists());
    assert_eq!(report.stored.len(), 2);
    assert_eq!(report.failed.len(), 2);
  }

  #[test]
  fn empty_dependency_list_still_creates_root() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("nested/root");

    let report = materialize(REPO, &root, &[], &TestFetcher::default(), &FsStore).unwrap();

    assert!(root.is_dir());
    assert_eq!(report, MaterializeReport::default());
  }
}
