//! Where the manifest comes from.
//!
//! A remote manifest is downloaded and written to a local cache file before
//! being resolved, so the exact bytes that were resolved stay inspectable.
//! A local manifest is read as-is.

use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::info;

use crate::fetch::{Fetch, FetchError, Store, StoreError};

/// Errors that can occur while obtaining the manifest. All of them are fatal.
#[derive(Debug, Error)]
pub enum SourceError {
  /// The manifest could not be downloaded.
  #[error("failed to download manifest: {0}")]
  Download(#[source] FetchError),

  /// The downloaded manifest could not be written to its cache file.
  #[error("failed to cache manifest: {0}")]
  Cache(#[source] StoreError),

  /// A local manifest could not be read.
  #[error("failed to read manifest '{}': {source}", .path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Location of the manifest to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
  /// Download from `url` and keep a copy at `cache`.
  Remote { url: String, cache: PathBuf },

  /// Read from a local file.
  Local(PathBuf),
}

impl ManifestSource {
  /// Obtain the manifest bytes.
  ///
  /// # Errors
  ///
  /// Returns [`SourceError`] if the download, the cache write or the local
  /// read fails.
  pub fn load(&self, fetcher: &impl Fetch, store: &impl Store) -> Result<Vec<u8>, SourceError> {
    match self {
      ManifestSource::Remote { url, cache } => {
        info!(url = %url, "downloading manifest");
        let bytes = fetcher.fetch(url).map_err(SourceError::Download)?;
        store.store(cache, &bytes).map_err(SourceError::Cache)?;
        info!(path = %cache.display(), size = bytes.len(), "cached manifest");
        Ok(bytes)
      }
      ManifestSource::Local(path) => {
        info!(path = %path.display(), "reading manifest");
        fs::read(path).map_err(|source| SourceError::Read {
          path: path.clone(),
          source,
        })
      }
    }
  }
}

impl fmt::Display for ManifestSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ManifestSource::Remote { url, .. } => f.write_str(url),
      ManifestSource::Local(path) => write!(f, "{}", path.display()),
    }
  }
}

/// Convert a URL to a safe filename.
///
/// Takes the last path component and sanitizes it. Falls back to hash of URL
/// if no suitable filename can be extracted.
pub fn url_to_filename(url: &str) -> String {
  if let Some(filename) = url.rsplit('/').next() {
    let filename = filename.split(['?', '#']).next().unwrap_or(filename);

    // Sanitize: only allow alphanumeric, dash, underscore, dot
    let sanitized: String = filename
      .chars()
      .map(|c| {
        if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
          c
        } else {
          '_'
        }
      })
      .collect();

    if !sanitized.is_empty() && sanitized != "." && sanitized != ".." {
      return sanitized;
    }
  }

  let mut hasher = Sha256::new();
  hasher.update(url.as_bytes());
  format!("manifest_{}.pom", &hex::encode(hasher.finalize())[..16])
}
