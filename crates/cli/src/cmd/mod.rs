mod config;
mod fetch;
mod resolve;

pub use config::cmd_config;
pub use fetch::cmd_fetch;
pub use resolve::cmd_resolve;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use pomfetch_lib::config::Config;
use pomfetch_lib::source::ManifestSource;

/// Where the manifest comes from. Defaults to the configured URL.
#[derive(Debug, Args)]
pub struct SourceArgs {
  /// Resolve a local manifest file instead of downloading one
  #[arg(long, value_name = "PATH", conflicts_with_all = ["url", "cache"])]
  manifest: Option<PathBuf>,

  /// Download the manifest from this URL
  #[arg(long)]
  url: Option<String>,

  /// Where to keep the downloaded manifest
  #[arg(long, value_name = "PATH")]
  cache: Option<PathBuf>,
}

impl SourceArgs {
  /// Apply flag overrides on top of `config`.
  fn apply(&self, config: &mut Config) {
    if let Some(url) = &self.url {
      config.manifest_url = url.clone();
      // A cache path derived from the old URL no longer matches.
      config.manifest_cache = None;
    }
    if let Some(cache) = &self.cache {
      config.manifest_cache = Some(cache.clone());
    }
  }

  fn source(&self, config: &Config) -> ManifestSource {
    match &self.manifest {
      Some(path) => ManifestSource::Local(path.clone()),
      None => config.manifest_source(),
    }
  }
}

/// Load the layered configuration and apply the source flags.
///
/// Callers apply their own overrides and then validate.
fn load_config(path: Option<&Path>, source: &SourceArgs) -> Result<Config> {
  let mut config = Config::load(path).context("Failed to load configuration")?;
  source.apply(&mut config);
  debug!(
    manifest_url = %config.manifest_url,
    repository_url = %config.repository_url,
    download_root = %config.download_root.display(),
    "effective configuration"
  );
  Ok(config)
}
