use anyhow::{Context, Result};

use rixpress_lib::Config;
use rixpress_lib::log::list_logs;

use crate::output::{OutputFormat, format_bytes, format_timestamp, print_info, print_json, print_stat};

pub fn cmd_logs(config: &Config, output: OutputFormat) -> Result<()> {
  let logs = list_logs(&config.project_path).context("Failed to list build logs")?;

  if output.is_json() {
    return print_json(&logs);
  }

  if logs.is_empty() {
    print_info("No build logs found");
    return Ok(());
  }

  for log in &logs {
    println!("{}", log.name);
    print_stat("Modified", &format_timestamp(log.modified));
    print_stat("Size", &format_bytes(log.size));
  }

  Ok(())
}
