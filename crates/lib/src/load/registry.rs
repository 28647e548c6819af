//! Loaders for artifacts written by other runtimes.
//!
//! Which loaders exist is decided once, when the registry is built, never by
//! probing at load time.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::process::{Command, Stdio};

use serde_json::Value;
use tracing::debug;

use crate::config::{Config, LoaderSpec};

use super::LoadError;

/// Deserializes one artifact into a JSON value.
pub trait ExternalLoader: Send + Sync {
  /// Short label used in diagnostics.
  fn name(&self) -> &str;

  fn load(&self, path: &Path) -> Result<Value, LoadError>;
}

/// Runs a shell command with the artifact path as its final argument and reads JSON from
/// its stdout.
///
/// e.g. `Rscript -e 'cat(jsonlite::toJSON(readRDS(commandArgs(TRUE)[1])))'`
#[derive(Debug, Clone)]
pub struct CommandLoader {
  command: String,
}

impl CommandLoader {
  pub fn new(command: impl Into<String>) -> Self {
    Self {
      command: command.into(),
    }
  }
}

impl ExternalLoader for CommandLoader {
  fn name(&self) -> &str {
    &self.command
  }

  fn load(&self, path: &Path) -> Result<Value, LoadError> {
    debug!(cmd = %self.command, path = %path.display(), "running external loader");

    let output = shell_command(&self.command, path)
      .stdin(Stdio::null())
      .output()
      .map_err(|e| LoadError::Loader {
        loader: self.command.clone(),
        message: e.to_string(),
      })?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(LoadError::Loader {
        loader: self.command.clone(),
        message: format!("exited with {}: {}", output.status, stderr.trim()),
      });
    }

    serde_json::from_slice(&output.stdout).map_err(|source| LoadError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }
}

/// `command` with the artifact path as its last argument. `sh` receives the
/// path as `$1`, so it is never re-parsed by the shell.
#[cfg(unix)]
fn shell_command(command: &str, path: &Path) -> Command {
  let mut cmd = Command::new("/bin/sh");
  cmd.arg("-c").arg(format!("{} \"$1\"", command)).arg("rxp-loader").arg(path);
  cmd
}

/// `cmd.exe` has no positional parameters; the quoted path is appended to the
/// command line.
#[cfg(windows)]
fn shell_command(command: &str, path: &Path) -> Command {
  let mut cmd = Command::new("cmd.exe");
  cmd.arg("/C").arg(format!("{} \"{}\"", command, path.display()));
  cmd
}

/// External loaders keyed by lowercase file extension.
#[derive(Default)]
pub struct LoaderRegistry {
  loaders: HashMap<String, Box<dyn ExternalLoader>>,
}

impl fmt::Debug for LoaderRegistry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut exts: Vec<_> = self.loaders.keys().collect();
    exts.sort();
    f.debug_struct("LoaderRegistry").field("extensions", &exts).finish()
  }
}

impl LoaderRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// A registry with a [`CommandLoader`] per configured loader spec.
  pub fn from_config(config: &Config) -> Self {
    config.loaders.iter().fold(Self::new(), |registry, LoaderSpec { ext, command }| {
      registry.with_loader(ext, CommandLoader::new(command.clone()))
    })
  }

  pub fn with_loader(mut self, ext: &str, loader: impl ExternalLoader + 'static) -> Self {
    self.register(ext, Box::new(loader));
    self
  }

  /// Later registrations for the same extension replace earlier ones.
  pub fn register(&mut self, ext: &str, loader: Box<dyn ExternalLoader>) {
    let ext = ext.trim_start_matches('.').to_ascii_lowercase();
    self.loaders.insert(ext, loader);
  }

  pub fn get(&self, ext: &str) -> Option<&dyn ExternalLoader> {
    self.loaders.get(&ext.to_ascii_lowercase()).map(Box::as_ref)
  }

  pub fn is_empty(&self) -> bool {
    self.loaders.is_empty()
  }
}
