//! Resolving derivation names to artifact paths.
//!
//! A name is either a literal store path, handled without touching the build
//! log, or a derivation identifier looked up in the log. Log-based resolution
//! joins each row's outputs onto its base path, deduplicates in first-seen
//! order and returns a single path or an ordered list of two or more.
//!
//! Note the asymmetry: a literal store directory holding several files
//! resolves to the directory itself, while a logged derivation with several
//! outputs resolves to the list of files.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::consts::DEFAULT_STORE_PREFIX;
use crate::log::{LogError, LogIndex, LogRow, LogSource};

#[derive(Debug, Error)]
pub enum ResolveError {
  #[error("no derivation called {0:?} found; run `rxp inspect` to check whether it was built successfully")]
  NotFound(String),

  #[error("no outputs recorded for derivation {0:?} in the build log")]
  NoOutputs(String),

  #[error("failed to read store path {path}: {source}")]
  ReadStore {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error(transparent)]
  Log(#[from] LogError),
}

/// The artifact path(s) a derivation produced.
///
/// `Many` always holds at least two paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResolvedTarget {
  Single(PathBuf),
  Many(Vec<PathBuf>),
}

impl ResolvedTarget {
  /// `None` for an empty list.
  pub fn from_paths(mut paths: Vec<PathBuf>) -> Option<Self> {
    match paths.len() {
      0 => None,
      1 => paths.pop().map(Self::Single),
      _ => Some(Self::Many(paths)),
    }
  }

  pub fn paths(&self) -> Vec<&Path> {
    match self {
      Self::Single(path) => vec![path.as_path()],
      Self::Many(paths) => paths.iter().map(PathBuf::as_path).collect(),
    }
  }
}

#[derive(Debug, Clone)]
pub struct ArtifactResolver {
  store_prefix: String,
}

impl Default for ArtifactResolver {
  fn default() -> Self {
    Self::new(DEFAULT_STORE_PREFIX)
  }
}

impl ArtifactResolver {
  pub fn new(store_prefix: impl Into<String>) -> Self {
    Self {
      store_prefix: store_prefix.into(),
    }
  }

  pub fn from_config(config: &Config) -> Self {
    Self::new(config.store_prefix.clone())
  }

  pub fn is_store_path(&self, name: &str) -> bool {
    name.starts_with(&self.store_prefix)
  }

  pub fn resolve(&self, name: &str, source: &LogSource) -> Result<ResolvedTarget, ResolveError> {
    if self.is_store_path(name) {
      return resolve_store_path(Path::new(name)).map(ResolvedTarget::Single);
    }

    let index = LogIndex::load(source)?;
    resolve_in_index(name, &index)
  }
}

/// Resolve `name` against rows already loaded.
pub fn resolve_in_index(name: &str, index: &LogIndex) -> Result<ResolvedTarget, ResolveError> {
  let rows = index.lookup(name);
  if rows.is_empty() {
    return Err(ResolveError::NotFound(name.to_string()));
  }

  let mut seen = HashSet::new();
  let mut paths = Vec::new();
  for row in rows {
    for path in row_outputs(row) {
      if seen.insert(path.clone()) {
        paths.push(path);
      }
    }
  }

  ResolvedTarget::from_paths(paths).ok_or_else(|| ResolveError::NoOutputs(name.to_string()))
}

/// Absolute output paths of one row. A row without an output field stands for
/// its base path.
fn row_outputs(row: &LogRow) -> Vec<PathBuf> {
  let Some(base) = row.base_path() else {
    debug!(identifiers = ?row.identifiers(), "skipping build log row without a store path");
    return Vec::new();
  };
  let base = PathBuf::from(base);

  match row.outputs() {
    None => vec![base],
    Some(outputs) => outputs
      .into_iter()
      .map(|out| {
        let out = PathBuf::from(out);
        if out.is_absolute() { out } else { base.join(out) }
      })
      .collect(),
  }
}

/// A directory with exactly one entry resolves to that entry; any other
/// directory, and any non-directory, resolves to itself.
fn resolve_store_path(path: &Path) -> Result<PathBuf, ResolveError> {
  if !path.is_dir() {
    return Ok(path.to_path_buf());
  }

  let read_err = |source| ResolveError::ReadStore {
    path: path.to_path_buf(),
    source,
  };

  let mut entries = fs::read_dir(path)
    .map_err(read_err)?
    .map(|entry| entry.map(|e| e.path()))
    .collect::<Result<Vec<_>, _>>()
    .map_err(read_err)?;
  entries.sort();

  match entries.len() {
    1 => Ok(entries.remove(0)),
    n => {
      debug!(path = %path.display(), entries = n, "store directory does not hold a single file, returning it as-is");
      Ok(path.to_path_buf())
    }
  }
}
