//! Loading resolved artifacts into memory.
//!
//! The format is picked from the file extension alone:
//!
//! - R artifacts (`.rds`) go to the external loader registered for that
//!   extension, if any;
//! - Python pickles (`.pickle`, `.pkl`) are decoded with `serde_pickle`;
//! - JSON artifacts (`.json`) are read with `serde_json`;
//! - anything else is an opaque reference and is returned as a path.
//!
//! Loading never fails. A missing loader, a loader error or a corrupt file
//! all degrade to returning the path, with a diagnostic logged. A cross-runtime
//! artifact whose loader fails is not retried as another format.

mod registry;
mod scope;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use serde_pickle::DeOptions;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::resolve::ResolvedTarget;

pub use registry::{CommandLoader, ExternalLoader, LoaderRegistry};
pub use scope::{BindError, Scope};

/// Extensions that need an external loader.
pub const CROSS_RUNTIME_EXTENSIONS: &[&str] = &["rds"];

pub const PICKLE_EXTENSIONS: &[&str] = &["pickle", "pkl"];

pub const JSON_EXTENSIONS: &[&str] = &["json"];

/// Why an artifact could not be turned into a value. Never returned from
/// [`ArtifactLoader`]; only logged.
#[derive(Debug, Error)]
pub enum LoadError {
  #[error("failed to read {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to deserialize {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("failed to unpickle {path}: {source}")]
  Unpickle {
    path: PathBuf,
    #[source]
    source: serde_pickle::Error,
  },

  #[error("loader {loader:?} failed: {message}")]
  Loader { loader: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
  CrossRuntime,
  Pickle,
  Json,
  Opaque,
}

impl ArtifactFormat {
  pub fn from_path(path: &Path) -> Self {
    let Some(ext) = extension(path) else {
      return Self::Opaque;
    };

    if CROSS_RUNTIME_EXTENSIONS.contains(&ext.as_str()) {
      Self::CrossRuntime
    } else if PICKLE_EXTENSIONS.contains(&ext.as_str()) {
      Self::Pickle
    } else if JSON_EXTENSIONS.contains(&ext.as_str()) {
      Self::Json
    } else {
      Self::Opaque
    }
  }
}

/// Result of loading: the value, or the path(s) it degraded to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Loaded {
  Value(Value),
  Path(PathBuf),
  Paths(Vec<PathBuf>),
}

impl Loaded {
  pub fn value(&self) -> Option<&Value> {
    match self {
      Self::Value(v) => Some(v),
      _ => None,
    }
  }

  pub fn is_value(&self) -> bool {
    matches!(self, Self::Value(_))
  }
}

#[derive(Debug, Default)]
pub struct ArtifactLoader {
  registry: LoaderRegistry,
}

impl ArtifactLoader {
  pub fn new(registry: LoaderRegistry) -> Self {
    Self { registry }
  }

  pub fn from_config(config: &Config) -> Self {
    Self::new(LoaderRegistry::from_config(config))
  }

  pub fn load(&self, resolved: &ResolvedTarget) -> Loaded {
    match resolved {
      ResolvedTarget::Many(paths) => Loaded::Paths(paths.clone()),
      ResolvedTarget::Single(path) => self.load_path(path),
    }
  }

  /// Like [`load`](Self::load), additionally binding a loaded value under
  /// `name` in `scope`. Binding problems are logged and otherwise ignored.
  pub fn load_and_bind(&self, resolved: &ResolvedTarget, name: &str, scope: &mut Scope) -> Loaded {
    let loaded = self.load(resolved);

    if let Loaded::Value(value) = &loaded
      && let Err(e) = scope.bind(name, value.clone())
    {
      debug!(binding = %name, error = %e, "could not bind loaded value");
    }

    loaded
  }

  pub fn load_path(&self, path: &Path) -> Loaded {
    if path.is_dir() {
      return Loaded::Path(path.to_path_buf());
    }

    let result = match ArtifactFormat::from_path(path) {
      ArtifactFormat::Opaque => return Loaded::Path(path.to_path_buf()),
      ArtifactFormat::CrossRuntime => self.load_cross_runtime(path),
      ArtifactFormat::Pickle => load_pickle(path).map(Some),
      ArtifactFormat::Json => load_json(path).map(Some),
    };

    match result {
      Ok(Some(value)) => Loaded::Value(value),
      Ok(None) => Loaded::Path(path.to_path_buf()),
      Err(e) => {
        warn!(path = %path.display(), error = %e, "failed to load artifact, returning its path");
        Loaded::Path(path.to_path_buf())
      }
    }
  }

  /// `Ok(None)` when no loader is registered for the extension.
  fn load_cross_runtime(&self, path: &Path) -> Result<Option<Value>, LoadError> {
    let ext = extension(path).unwrap_or_default();
    let Some(loader) = self.registry.get(&ext) else {
      debug!(path = %path.display(), ext = %ext, "no loader registered for extension");
      return Ok(None);
    };

    loader.load(path).map(Some)
  }
}

fn open(path: &Path) -> Result<BufReader<File>, LoadError> {
  File::open(path).map(BufReader::new).map_err(|source| LoadError::Read {
    path: path.to_path_buf(),
    source,
  })
}

fn load_json(path: &Path) -> Result<Value, LoadError> {
  serde_json::from_reader(open(path)?).map_err(|source| LoadError::Parse {
    path: path.to_path_buf(),
    source,
  })
}

/// Pickles holding only plain data (dicts with string keys, lists, numbers,
/// strings, booleans, None) decode; anything else is an error.
fn load_pickle(path: &Path) -> Result<Value, LoadError> {
  serde_pickle::from_reader(open(path)?, DeOptions::new()).map_err(|source| LoadError::Unpickle {
    path: path.to_path_buf(),
    source,
  })
}

fn extension(path: &Path) -> Option<String> {
  path
    .extension()
    .and_then(|e| e.to_str())
    .map(str::to_ascii_lowercase)
}
