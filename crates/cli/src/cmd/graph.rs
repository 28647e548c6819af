//! `rxp graph`: print the pipeline's nodes and edges.

use anyhow::{Context, Result};

use rixpress_lib::Pipeline;
use rixpress_lib::dag::DependencyGraph;

use crate::output::{self, OutputFormat, print_json, print_stat};

pub fn load_graph(pipeline: &Pipeline) -> Result<DependencyGraph> {
  pipeline
    .graph()
    .with_context(|| format!("Failed to load dependency graph from {}", pipeline.dag_path().display()))
}

pub fn cmd_graph(pipeline: &Pipeline, drop_dangling: bool, output: OutputFormat) -> Result<()> {
  let mut graph = load_graph(pipeline)?;
  if drop_dangling {
    graph = graph.without_dangling();
  }

  if output.is_json() {
    return print_json(&graph);
  }

  println!("Nodes:");
  for node in &graph.nodes {
    println!("  {} {}", output::symbols::INFO, node.id);
    print_stat("  Type", node.kind.as_deref().unwrap_or("-"));
    print_stat("  Group", &node.pipeline_group);
    if let Some(color) = &node.pipeline_color {
      print_stat("  Color", color);
    }
  }

  println!();
  println!("Edges:");
  for edge in &graph.edges {
    println!("  {} {} {}", edge.source, output::symbols::ARROW, edge.target);
  }

  Ok(())
}
