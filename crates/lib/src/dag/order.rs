//! CI stage ordering.
//!
//! Each node gets a layer one past the deepest of its dependencies, so a
//! stage only needs the stages before it. Within a layer nodes keep their
//! declaration order, which keeps the output stable from run to run.

use std::collections::{BTreeSet, HashMap};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use tracing::debug;

use super::DagError;
use super::types::DependencyGraph;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CiOrder {
  layers: Vec<Vec<String>>,
  #[serde(skip)]
  layer_of: HashMap<String, usize>,
}

impl CiOrder {
  /// Nodes grouped by layer, layer 0 first.
  pub fn layers(&self) -> &[Vec<String>] {
    &self.layers
  }

  /// All nodes in topological order.
  pub fn order(&self) -> Vec<&str> {
    self.layers.iter().flatten().map(String::as_str).collect()
  }

  pub fn layer_of(&self, id: &str) -> Option<usize> {
    self.layer_of.get(id).copied()
  }

  pub fn stage_count(&self) -> usize {
    self.layers.len()
  }
}

/// Layer the declared nodes of `graph`.
///
/// Edges with an undeclared endpoint are ignored. Fails with
/// [`DagError::CycleDetected`] when some nodes can never be scheduled.
pub fn order(graph: &DependencyGraph) -> Result<CiOrder, DagError> {
  let mut dag: DiGraph<&str, ()> = DiGraph::new();
  let mut indices: HashMap<&str, NodeIndex> = HashMap::new();

  for node in &graph.nodes {
    indices.entry(node.id.as_str()).or_insert_with(|| dag.add_node(node.id.as_str()));
  }

  for edge in &graph.edges {
    match (indices.get(edge.source.as_str()), indices.get(edge.target.as_str())) {
      (Some(&source), Some(&target)) => {
        dag.add_edge(source, target, ());
      }
      _ => debug!(source = %edge.source, target = %edge.target, "ignoring dangling edge"),
    }
  }

  let mut in_degree: Vec<usize> = dag
    .node_indices()
    .map(|idx| dag.neighbors_directed(idx, Direction::Incoming).count())
    .collect();

  // Node indices follow declaration order.
  let mut remaining: BTreeSet<NodeIndex> = dag.node_indices().collect();
  let mut layers: Vec<Vec<String>> = Vec::new();

  while !remaining.is_empty() {
    let ready: Vec<NodeIndex> = remaining
      .iter()
      .copied()
      .filter(|idx| in_degree[idx.index()] == 0)
      .collect();

    if ready.is_empty() {
      return Err(DagError::CycleDetected {
        remaining: remaining.iter().map(|idx| dag[*idx].to_string()).collect(),
      });
    }

    for &idx in &ready {
      remaining.remove(&idx);
      for dependent in dag.neighbors_directed(idx, Direction::Outgoing) {
        let deg = &mut in_degree[dependent.index()];
        *deg = deg.saturating_sub(1);
      }
    }

    layers.push(ready.iter().map(|idx| dag[*idx].to_string()).collect());
  }

  let layer_of = layers
    .iter()
    .enumerate()
    .flat_map(|(level, ids)| ids.iter().map(move |id| (id.clone(), level)))
    .collect();

  Ok(CiOrder { layers, layer_of })
}

impl DependencyGraph {
  pub fn ci_order(&self) -> Result<CiOrder, DagError> {
    order(self)
  }
}
