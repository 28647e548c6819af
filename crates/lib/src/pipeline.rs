//! Entry points combining resolution, loading and the project layout.

use std::path::PathBuf;

use crate::config::Config;
use crate::dag::{DagError, DependencyGraph};
use crate::load::{ArtifactLoader, Loaded, Scope};
use crate::log::{LogError, LogIndex, LogSource};
use crate::resolve::{ArtifactResolver, ResolveError, ResolvedTarget};

/// A configured view of one pipeline project.
#[derive(Debug)]
pub struct Pipeline {
  resolver: ArtifactResolver,
  loader: ArtifactLoader,
  source: LogSource,
  dag_path: PathBuf,
}

impl Pipeline {
  pub fn new(resolver: ArtifactResolver, loader: ArtifactLoader, source: LogSource, dag_path: PathBuf) -> Self {
    Self {
      resolver,
      loader,
      source,
      dag_path,
    }
  }

  pub fn from_config(config: &Config) -> Self {
    Self::new(
      ArtifactResolver::from_config(config),
      ArtifactLoader::from_config(config),
      LogSource::from_config(config),
      config.dag_path(),
    )
  }

  /// Read rows from `source` instead of the project's logs.
  pub fn with_log_source(mut self, source: LogSource) -> Self {
    self.source = source;
    self
  }

  pub fn with_dag_path(mut self, path: PathBuf) -> Self {
    self.dag_path = path;
    self
  }

  pub fn resolve(&self, name: &str) -> Result<ResolvedTarget, ResolveError> {
    self.resolver.resolve(name, &self.source)
  }

  /// Resolve `name` and load its artifact when it is a single loadable file.
  pub fn read(&self, name: &str) -> Result<Loaded, ResolveError> {
    let resolved = self.resolve(name)?;
    Ok(self.loader.load(&resolved))
  }

  /// Like [`read`](Self::read), also binding a loaded value under `name`.
  pub fn load(&self, name: &str, scope: &mut Scope) -> Result<Loaded, ResolveError> {
    let resolved = self.resolve(name)?;
    Ok(self.loader.load_and_bind(&resolved, name, scope))
  }

  pub fn inspect(&self) -> Result<LogIndex, LogError> {
    LogIndex::load(&self.source)
  }

  pub fn graph(&self) -> Result<DependencyGraph, DagError> {
    DependencyGraph::load(&self.dag_path)
  }

  pub fn dag_path(&self) -> &PathBuf {
    &self.dag_path
  }
}
