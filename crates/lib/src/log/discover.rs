//! Locating build logs inside a project.
//!
//! The build tool writes one `build_log*.json` per build session into
//! `<project>/_rixpress/`. Without a selector the most recently modified log
//! wins; ties fall back to the file name, descending, so timestamped names
//! sort newest first.

use std::cmp::Reverse;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::project_dir;
use crate::consts::BUILD_LOG_PREFIX;

use super::LogError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogFileInfo {
  pub name: String,
  pub path: PathBuf,
  /// Seconds since the Unix epoch.
  pub modified: u64,
  pub size: u64,
}

/// All build logs of a project, most recent first.
pub fn list_logs(project_path: &Path) -> Result<Vec<LogFileInfo>, LogError> {
  let dir = project_dir(project_path);

  let entries = match fs::read_dir(&dir) {
    Ok(entries) => entries,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(LogError::NoLogDir(dir)),
    Err(source) => return Err(LogError::Read { path: dir, source }),
  };

  let mut logs = Vec::new();
  for entry in entries.flatten() {
    let name = entry.file_name().to_string_lossy().into_owned();
    if !is_build_log_name(&name) {
      continue;
    }

    let Ok(metadata) = entry.metadata() else {
      debug!(file = %name, "skipping unreadable log entry");
      continue;
    };
    if !metadata.is_file() {
      continue;
    }

    let modified = metadata
      .modified()
      .ok()
      .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
      .map(|d| d.as_secs())
      .unwrap_or(0);

    logs.push(LogFileInfo {
      path: entry.path(),
      name,
      modified,
      size: metadata.len(),
    });
  }

  logs.sort_by_key(|log| Reverse((log.modified, log.name.clone())));
  Ok(logs)
}

/// Pick the build log to read.
///
/// With `which_log`, only logs whose file name contains the selector are
/// candidates.
pub fn find_log(project_path: &Path, which_log: Option<&str>) -> Result<PathBuf, LogError> {
  let logs = list_logs(project_path)?;
  let dir = project_dir(project_path);

  if logs.is_empty() {
    return Err(LogError::NoLogFound(dir));
  }

  let chosen = match which_log {
    Some(selector) => logs
      .into_iter()
      .find(|log| log.name.contains(selector))
      .ok_or_else(|| LogError::NoMatchingLog {
        selector: selector.to_string(),
        dir,
      })?,
    None => logs.into_iter().next().ok_or(LogError::NoLogFound(project_dir(project_path)))?,
  };

  info!(log = %chosen.path.display(), "using build log");
  Ok(chosen.path)
}

fn is_build_log_name(name: &str) -> bool {
  name.starts_with(BUILD_LOG_PREFIX) && name.ends_with(".json")
}
