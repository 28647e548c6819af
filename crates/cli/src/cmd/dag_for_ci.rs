//! `rxp dag-for-ci`: export the dependency graph as DOT for CI pipelines.
//!
//! The graph is checked for cycles before anything is written.

use std::path::PathBuf;

use anyhow::{Context, Result};

use rixpress_lib::Pipeline;
use rixpress_lib::dag::write_dot;

use super::graph::load_graph;
use crate::output::{OutputFormat, print_json, print_stat, print_success};

pub fn cmd_dag_for_ci(pipeline: &Pipeline, out: PathBuf, output: OutputFormat) -> Result<()> {
  let graph = load_graph(pipeline)?;
  let order = graph.ci_order().context("Refusing to export a cyclic graph")?;

  write_dot(&graph, &out).with_context(|| format!("Failed to write {}", out.display()))?;

  if output.is_json() {
    let json = serde_json::json!({ "path": out, "stages": order.layers(), "nodes": graph.nodes.len() });
    return print_json(&json);
  }

  print_success(&format!("Wrote {}", out.display()));
  print_stat("Nodes", &graph.nodes.len().to_string());
  print_stat("Edges", &graph.edges.len().to_string());
  print_stat("Stages", &order.stage_count().to_string());
  for (stage, ids) in order.layers().iter().enumerate() {
    println!("    {}: {}", stage, ids.join(", "));
  }

  Ok(())
}
