//! `rxp inspect`: show the rows of the selected build log.

use anyhow::{Context, Result};
use serde::Serialize;

use rixpress_lib::Pipeline;
use rixpress_lib::log::LogRow;

use crate::output::{self, OutputFormat, print_info, print_json, print_stat, print_warning};

#[derive(Serialize)]
struct RowView {
  derivation: Vec<String>,
  path: Option<String>,
  outputs: Option<Vec<String>>,
  build_success: Option<bool>,
  error_message: Option<String>,
}

impl From<&LogRow> for RowView {
  fn from(row: &LogRow) -> Self {
    Self {
      derivation: row.identifiers(),
      path: row.base_path(),
      outputs: row.outputs(),
      build_success: row.build_success(),
      error_message: row.error_message(),
    }
  }
}

pub fn cmd_inspect(pipeline: &Pipeline, failed_only: bool, output: OutputFormat) -> Result<()> {
  let index = pipeline.inspect().context("Failed to load build log")?;

  let rows: Vec<&LogRow> = if failed_only {
    index.failed()
  } else {
    index.rows().iter().collect()
  };

  if output.is_json() {
    let views: Vec<RowView> = rows.into_iter().map(RowView::from).collect();
    return print_json(&views);
  }

  if let Some(path) = index.path() {
    print_info(&format!("Build log: {}", path.display()));
  }

  if rows.is_empty() {
    print_info("No rows to show");
    return Ok(());
  }

  for row in &rows {
    let symbol = match row.build_success() {
      Some(true) => output::symbols::SUCCESS,
      Some(false) => output::symbols::ERROR,
      None => output::symbols::INFO,
    };
    println!();
    println!("{} {}", symbol, row.identifiers().join(", "));
    print_stat("Path", row.base_path().as_deref().unwrap_or("-"));
    if let Some(outputs) = row.outputs() {
      print_stat("Outputs", &outputs.join(", "));
    }
    if let Some(message) = row.error_message() {
      print_stat("Error", &message);
    }
  }

  let failed = index.failed().len();
  if failed > 0 {
    println!();
    print_warning(&format!("{} derivation(s) failed to build", failed));
  }

  Ok(())
}
