//! Build log loading and lookup.
//!
//! The build log is a JSON list of row objects written by the external build
//! tool. It is only ever read here.

mod discover;
mod row;

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

pub use discover::{LogFileInfo, find_log, list_logs};
pub use row::LogRow;

#[derive(Debug, Error)]
pub enum LogError {
  #[error("no build log directory at {0}; has the pipeline been built?")]
  NoLogDir(PathBuf),

  #[error("no build logs found in {0}")]
  NoLogFound(PathBuf),

  #[error("no build log matching {selector:?} in {dir}")]
  NoMatchingLog { selector: String, dir: PathBuf },

  #[error("failed to read {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse build log {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("build log {0} is not a list of rows")]
  NotAList(PathBuf),
}

/// Where build log rows come from.
#[derive(Debug, Clone)]
pub enum LogSource {
  /// A specific log file.
  File(PathBuf),

  /// The most recent (or selected) log of a project.
  Project { path: PathBuf, which_log: Option<String> },

  /// Rows already held in memory.
  Rows(Vec<LogRow>),
}

impl LogSource {
  pub fn from_config(config: &Config) -> Self {
    Self::Project {
      path: config.project_path.clone(),
      which_log: config.which_log.clone(),
    }
  }

  /// Pin the log a project would currently read to a [`LogSource::File`].
  pub fn locate(project_path: &Path, which_log: Option<&str>) -> Result<Self, LogError> {
    find_log(project_path, which_log).map(Self::File)
  }
}

/// Rows of one build log, searchable by target identifier.
#[derive(Debug, Clone, Default)]
pub struct LogIndex {
  rows: Vec<LogRow>,
  path: Option<PathBuf>,
}

impl LogIndex {
  pub fn from_rows(rows: Vec<LogRow>) -> Self {
    Self { rows, path: None }
  }

  pub fn load(source: &LogSource) -> Result<Self, LogError> {
    match source {
      LogSource::File(path) => Self::load_file(path),
      LogSource::Project { path, which_log } => Self::load(&LogSource::locate(path, which_log.as_deref())?),
      LogSource::Rows(rows) => Ok(Self::from_rows(rows.clone())),
    }
  }

  pub fn load_file(path: &Path) -> Result<Self, LogError> {
    let content = fs::read_to_string(path).map_err(|source| LogError::Read {
      path: path.to_path_buf(),
      source,
    })?;

    let mut index = Self::parse(&content, path)?;
    index.path = Some(path.to_path_buf());
    Ok(index)
  }

  /// Parse a log document. Entries that are not objects are skipped.
  pub fn parse(content: &str, path: &Path) -> Result<Self, LogError> {
    let document: Value = serde_json::from_str(content).map_err(|source| LogError::Parse {
      path: path.to_path_buf(),
      source,
    })?;

    let Value::Array(entries) = document else {
      return Err(LogError::NotAList(path.to_path_buf()));
    };

    let mut rows = Vec::with_capacity(entries.len());
    for (i, entry) in entries.into_iter().enumerate() {
      if !entry.is_object() {
        debug!(index = i, "skipping non-object build log entry");
        continue;
      }
      let row = serde_json::from_value(entry).map_err(|source| LogError::Parse {
        path: path.to_path_buf(),
        source,
      })?;
      rows.push(row);
    }

    Ok(Self::from_rows(rows))
  }

  pub fn rows(&self) -> &[LogRow] {
    &self.rows
  }

  /// File the rows were read from, if any.
  pub fn path(&self) -> Option<&Path> {
    self.path.as_deref()
  }

  /// Rows whose identifier list contains `name` exactly, in log order.
  pub fn lookup(&self, name: &str) -> Vec<&LogRow> {
    self.rows.iter().filter(|row| row.has_identifier(name)).collect()
  }

  /// Rows whose build explicitly did not succeed.
  pub fn failed(&self) -> Vec<&LogRow> {
    self.rows.iter().filter(|row| row.build_success() == Some(false)).collect()
  }
}
