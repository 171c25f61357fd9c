//! Run configuration.
//!
//! Settings are layered, later layers winning:
//!
//! 1. built-in defaults
//! 2. a TOML file (`--config <path>`, or `config.toml` in the config directory if present)
//! 3. `POMFETCH_*` environment variables
//! 4. command-line flags, applied by the caller
//!
//! # File Format
//!
//! ```toml
//! manifest_url = "https://repo1.maven.org/maven2/org/apache/flink/flink-parent/1.20.1/flink-parent-1.20.1.pom"
//! manifest_cache = "/tmp/flink-parent.pom"
//! repository_url = "https://repo1.maven.org/maven2"
//! download_root = "/tmp/repository"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::consts::{CONFIG_FILENAME, DEFAULT_MANIFEST_URL, DEFAULT_REPOSITORY_URL, ENV_PREFIX};
use crate::platform::paths::{config_dir, manifests_dir, repository_dir};
use crate::source::{ManifestSource, url_to_filename};

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// Failed to read the config file.
  #[error("failed to read config file '{}': {source}", .path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// Failed to parse the config file.
  #[error("failed to parse config file '{}': {source}", .path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },

  /// A setting has an unusable value.
  #[error("invalid {key}: {message}")]
  Invalid { key: &'static str, message: String },
}

/// Static settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
  /// URL of the manifest to resolve.
  pub manifest_url: String,

  /// Where the downloaded manifest is kept. Derived from the URL when unset.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub manifest_cache: Option<PathBuf>,

  /// Base URL of the remote artifact repository.
  pub repository_url: String,

  /// Root of the local artifact tree.
  pub download_root: PathBuf,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      manifest_url: DEFAULT_MANIFEST_URL.to_string(),
      manifest_cache: None,
      repository_url: DEFAULT_REPOSITORY_URL.to_string(),
      download_root: repository_dir(),
    }
  }
}

impl Config {
  /// Load defaults, the config file and environment overrides.
  ///
  /// An explicit `path` must exist. Without one, the default config file is
  /// used only if present.
  pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
    let mut config = match path {
      Some(path) => Self::from_file(path)?,
      None => Self::read_optional(&default_config_path())?.unwrap_or_default(),
    };

    config.apply_env();
    config.validate()?;
    Ok(config)
  }

  /// Read a config file that must exist.
  pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    Self::parse(path, &content)
  }

  /// Read a config file, returning `Ok(None)` if it doesn't exist.
  fn read_optional(path: &Path) -> Result<Option<Self>, ConfigError> {
    let content = match fs::read_to_string(path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
      Err(source) => {
        return Err(ConfigError::Read {
          path: path.to_path_buf(),
          source,
        });
      }
    };
    Self::parse(path, &content).map(Some)
  }

  fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
    let config = toml::from_str(content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })?;
    debug!(path = %path.display(), "loaded config file");
    Ok(config)
  }

  /// Override settings from `POMFETCH_*` environment variables.
  ///
  /// Unset and empty variables are ignored.
  pub fn apply_env(&mut self) {
    if let Some(value) = env_var("MANIFEST_URL") {
      self.manifest_url = value;
    }
    if let Some(value) = env_var("MANIFEST_CACHE") {
      self.manifest_cache = Some(PathBuf::from(value));
    }
    if let Some(value) = env_var("REPOSITORY_URL") {
      self.repository_url = value;
    }
    if let Some(value) = env_var("DOWNLOAD_ROOT") {
      self.download_root = PathBuf::from(value);
    }
  }

  /// Check that URLs are usable.
  pub fn validate(&self) -> Result<(), ConfigError> {
    check_url("manifest_url", &self.manifest_url)?;
    check_url("repository_url", &self.repository_url)?;
    if self.download_root.as_os_str().is_empty() {
      return Err(ConfigError::Invalid {
        key: "download_root",
        message: "must not be empty".to_string(),
      });
    }
    Ok(())
  }

  /// Cache file for the downloaded manifest.
  pub fn manifest_cache_path(&self) -> PathBuf {
    self
      .manifest_cache
      .clone()
      .unwrap_or_else(|| manifests_dir().join(url_to_filename(&self.manifest_url)))
  }

  /// The configured remote manifest.
  pub fn manifest_source(&self) -> ManifestSource {
    ManifestSource::Remote {
      url: self.manifest_url.clone(),
      cache: self.manifest_cache_path(),
    }
  }
}

/// Path of the config file read when none is given.
pub fn default_config_path() -> PathBuf {
  config_dir().join(CONFIG_FILENAME)
}

fn env_var(name: &str) -> Option<String> {
  std::env::var(format!("{ENV_PREFIX}{name}"))
    .ok()
    .filter(|value| !value.is_empty())
}

fn check_url(key: &'static str, url: &str) -> Result<(), ConfigError> {
  if url.starts_with("http://") || url.starts_with("https://") {
    Ok(())
  } else {
    Err(ConfigError::Invalid {
      key,
      message: format!("'{url}' is not an http(s) URL"),
    })
  }
}
