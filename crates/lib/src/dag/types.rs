//! Dependency description input and graph output types.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A field the producer may write either bare or wrapped in a list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Wrapped<T> {
  Many(Vec<T>),
  One(T),
}

impl<T> Wrapped<T> {
  pub fn into_first(self) -> Option<T> {
    match self {
      Self::Many(items) => items.into_iter().next(),
      Self::One(item) => Some(item),
    }
  }

  pub fn into_vec(self) -> Vec<T> {
    match self {
      Self::Many(items) => items,
      Self::One(item) => vec![item],
    }
  }
}

/// The `dag.json` document written by the pipeline generator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DagDescription {
  #[serde(default)]
  pub derivations: Vec<DerivationRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DerivationRecord {
  #[serde(default)]
  pub deriv_name: Option<Wrapped<Option<String>>>,

  #[serde(default)]
  pub depends: Option<Wrapped<Option<String>>>,

  #[serde(default, rename = "type")]
  pub kind: Option<Wrapped<Option<String>>>,

  #[serde(default)]
  pub pipeline_group: Option<Wrapped<Option<String>>>,

  #[serde(default)]
  pub pipeline_color: Option<Wrapped<Option<String>>>,
}

impl DerivationRecord {
  /// Shorthand used by callers that build descriptions in code.
  pub fn new(name: &str, depends: &[&str]) -> Self {
    Self {
      deriv_name: Some(Wrapped::Many(vec![Some(name.to_string())])),
      depends: Some(Wrapped::Many(depends.iter().map(|d| Some(d.to_string())).collect())),
      ..Self::default()
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
  pub id: String,
  #[serde(rename = "type")]
  pub kind: Option<String>,
  pub pipeline_group: String,
  pub pipeline_color: Option<String>,
}

/// `source` must be available before `target`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
  pub source: String,
  pub target: String,
}

impl Edge {
  pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
    Self {
      source: source.into(),
      target: target.into(),
    }
  }
}

/// Nodes in declaration order plus the raw edge list.
///
/// Edges may name undeclared nodes; see [`DependencyGraph::dangling_edges`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyGraph {
  pub nodes: Vec<Node>,
  pub edges: Vec<Edge>,
}

impl DependencyGraph {
  pub fn node(&self, id: &str) -> Option<&Node> {
    self.nodes.iter().find(|n| n.id == id)
  }

  pub fn node_ids(&self) -> HashSet<&str> {
    self.nodes.iter().map(|n| n.id.as_str()).collect()
  }

  /// Edges with an endpoint that is not a declared node.
  pub fn dangling_edges(&self) -> Vec<&Edge> {
    let ids = self.node_ids();
    self
      .edges
      .iter()
      .filter(|e| !ids.contains(e.source.as_str()) || !ids.contains(e.target.as_str()))
      .collect()
  }

  /// A copy without dangling edges.
  pub fn without_dangling(&self) -> Self {
    let ids = self.node_ids();
    Self {
      nodes: self.nodes.clone(),
      edges: self
        .edges
        .iter()
        .filter(|e| ids.contains(e.source.as_str()) && ids.contains(e.target.as_str()))
        .cloned()
        .collect(),
    }
  }

  /// Direct dependencies of `id`, in edge order.
  pub fn dependencies_of(&self, id: &str) -> Vec<&str> {
    self
      .edges
      .iter()
      .filter(|e| e.target == id)
      .map(|e| e.source.as_str())
      .collect()
  }
}
