//! Application-wide constants.

/// Name used for configuration and cache directories.
pub const APP_NAME: &str = "pomfetch";

/// Manifest resolved when no URL or path is configured.
pub const DEFAULT_MANIFEST_URL: &str =
  "https://repo1.maven.org/maven2/org/apache/flink/flink-parent/1.20.1/flink-parent-1.20.1.pom";

/// Remote repository artifacts are fetched from by default.
pub const DEFAULT_REPOSITORY_URL: &str = "https://repo1.maven.org/maven2";

/// Configuration file name inside the config directory.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Prefix for environment variable overrides (`POMFETCH_REPOSITORY_URL`, ...).
pub const ENV_PREFIX: &str = "POMFETCH_";
