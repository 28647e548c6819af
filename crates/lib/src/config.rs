//! Runtime configuration.
//!
//! Values come from defaults, then environment variables, then whatever the
//! caller (usually the CLI) sets on top. The configuration is read once at
//! startup; nothing re-reads the environment per call.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

use crate::consts::{DAG_FILENAME, DEFAULT_STORE_PREFIX, PROJECT_DIR};

pub const ENV_PROJECT_DIR: &str = "RIXPRESS_PROJECT_DIR";
pub const ENV_STORE_PREFIX: &str = "RIXPRESS_STORE_PREFIX";
pub const ENV_WHICH_LOG: &str = "RIXPRESS_WHICH_LOG";
pub const ENV_LOADERS: &str = "RIXPRESS_LOADERS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
  #[error("invalid loader spec {0:?}: expected EXT=COMMAND")]
  InvalidLoader(String),
}

/// An external loader declaration: artifacts with extension `ext` are handed
/// to `command`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderSpec {
  /// Lowercase extension without the leading dot.
  pub ext: String,
  pub command: String,
}

impl FromStr for LoaderSpec {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let (ext, command) = s
      .split_once('=')
      .ok_or_else(|| ConfigError::InvalidLoader(s.to_string()))?;

    let ext = ext.trim().trim_start_matches('.').to_ascii_lowercase();
    let command = command.trim();
    if ext.is_empty() || command.is_empty() {
      return Err(ConfigError::InvalidLoader(s.to_string()));
    }

    Ok(Self {
      ext,
      command: command.to_string(),
    })
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  /// Root of the pipeline project (contains `_rixpress/`).
  pub project_path: PathBuf,

  /// Substring selecting a specific build log; `None` picks the most recent.
  pub which_log: Option<String>,

  /// Names starting with this prefix are literal store paths.
  pub store_prefix: String,

  /// External loaders for cross-runtime artifact formats.
  pub loaders: Vec<LoaderSpec>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      project_path: PathBuf::from("."),
      which_log: None,
      store_prefix: DEFAULT_STORE_PREFIX.to_string(),
      loaders: Vec::new(),
    }
  }
}

impl Config {
  /// Defaults overridden by `RIXPRESS_*` environment variables.
  pub fn from_env() -> Result<Self, ConfigError> {
    let mut config = Self::default();

    if let Ok(path) = std::env::var(ENV_PROJECT_DIR) {
      config.project_path = PathBuf::from(path);
    }

    if let Ok(prefix) = std::env::var(ENV_STORE_PREFIX)
      && !prefix.is_empty()
    {
      config.store_prefix = prefix;
    }

    if let Ok(which) = std::env::var(ENV_WHICH_LOG)
      && !which.is_empty()
    {
      config.which_log = Some(which);
    }

    if let Ok(loaders) = std::env::var(ENV_LOADERS) {
      config.loaders = parse_loader_list(&loaders)?;
    }

    Ok(config)
  }

  /// `<project>/_rixpress`
  pub fn project_dir(&self) -> PathBuf {
    project_dir(&self.project_path)
  }

  /// Default location of the dependency description.
  pub fn dag_path(&self) -> PathBuf {
    self.project_dir().join(DAG_FILENAME)
  }
}

pub fn project_dir(project_path: &Path) -> PathBuf {
  project_path.join(PROJECT_DIR)
}

/// Parse a `;`-separated list of `EXT=COMMAND` entries. Empty entries are ignored.
pub fn parse_loader_list(s: &str) -> Result<Vec<LoaderSpec>, ConfigError> {
  s.split(';')
    .map(str::trim)
    .filter(|entry| !entry.is_empty())
    .map(LoaderSpec::from_str)
    .collect()
}
