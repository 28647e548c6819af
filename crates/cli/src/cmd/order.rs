use anyhow::{Context, Result};

use rixpress_lib::Pipeline;

use super::graph::load_graph;
use crate::output::{OutputFormat, print_json};

pub fn cmd_order(pipeline: &Pipeline, output: OutputFormat) -> Result<()> {
  let graph = load_graph(pipeline)?;
  let order = graph.ci_order().context("Failed to order pipeline stages")?;

  if output.is_json() {
    let json = serde_json::json!({ "layers": order.layers(), "order": order.order() });
    return print_json(&json);
  }

  for (stage, ids) in order.layers().iter().enumerate() {
    println!("Stage {}: {}", stage, ids.join(", "));
  }

  Ok(())
}
