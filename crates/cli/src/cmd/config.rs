//! Config command implementation.

use std::path::Path;

use anyhow::{Context, Result};

use pomfetch_lib::config::{Config, default_config_path};

use crate::output::{OutputFormat, print_info, print_json, print_stat};

pub fn cmd_config(path: Option<&Path>, format: OutputFormat) -> Result<()> {
  let config = Config::load(path).context("Failed to load configuration")?;

  if format.is_json() {
    return print_json(&config);
  }

  let file = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
  print_info(&format!("Config file: {}", file.display()));
  print_stat("Manifest URL", &config.manifest_url);
  print_stat("Manifest cache", &config.manifest_cache_path().display().to_string());
  print_stat("Repository URL", &config.repository_url);
  print_stat("Download root", &config.download_root.display().to_string());

  Ok(())
}
