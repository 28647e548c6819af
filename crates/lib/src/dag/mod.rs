//! Pipeline dependency graph.
//!
//! Built from the `dag.json` description the pipeline generator writes next
//! to the build logs. The graph is plain node and edge lists for rendering
//! consumers; [`order`] layers it into CI stages.

mod builder;
mod dot;
mod order;
mod types;

use std::path::PathBuf;

use thiserror::Error;

pub use builder::build;
pub use dot::{to_dot, write_dot};
pub use order::{CiOrder, order};
pub use types::{DagDescription, DependencyGraph, DerivationRecord, Edge, Node, Wrapped};

#[derive(Debug, Error)]
pub enum DagError {
  #[error("dependency cycle detected among: {}", remaining.join(", "))]
  CycleDetected { remaining: Vec<String> },

  #[error("derivation #{index} has no name")]
  MissingName { index: usize },

  #[error("failed to read {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse dependency description {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("derivation #{index} in {path} is malformed: {source}")]
  InvalidRecord {
    path: PathBuf,
    index: usize,
    #[source]
    source: serde_json::Error,
  },

  #[error("failed to write {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}
