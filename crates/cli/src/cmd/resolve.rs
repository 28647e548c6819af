use anyhow::{Context, Result};

use rixpress_lib::Pipeline;

use crate::output::{OutputFormat, print_json};

pub fn cmd_resolve(pipeline: &Pipeline, name: &str, output: OutputFormat) -> Result<()> {
  let resolved = pipeline
    .resolve(name)
    .with_context(|| format!("Failed to resolve {}", name))?;

  if output.is_json() {
    print_json(&resolved)?;
  } else {
    for path in resolved.paths() {
      println!("{}", path.display());
    }
  }

  Ok(())
}
