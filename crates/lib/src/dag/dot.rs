//! DOT export of the dependency graph for CI tooling.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use super::DagError;
use super::types::DependencyGraph;

/// Render `graph` as a DOT digraph, nodes then edges, in declaration order.
pub fn to_dot(graph: &DependencyGraph) -> String {
  let mut out = String::from("digraph G {\n");

  for node in &graph.nodes {
    let id = quote(&node.id);
    let _ = writeln!(out, "  {id} [label={id}];");
  }

  for edge in &graph.edges {
    let _ = writeln!(out, "  {} -> {};", quote(&edge.source), quote(&edge.target));
  }

  out.push_str("}\n");
  out
}

pub fn write_dot(graph: &DependencyGraph, path: &Path) -> Result<(), DagError> {
  let write_err = |source| DagError::Write {
    path: path.to_path_buf(),
    source,
  };

  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
  {
    fs::create_dir_all(parent).map_err(write_err)?;
  }

  fs::write(path, to_dot(graph)).map_err(write_err)
}

fn quote(id: &str) -> String {
  format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\""))
}
