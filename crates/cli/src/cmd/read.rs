//! `rxp read`: resolve a derivation and print its loaded value.
//!
//! Artifacts that cannot be loaded are printed as their path(s), same as
//! `rxp resolve`.

use anyhow::{Context, Result};

use rixpress_lib::Pipeline;
use rixpress_lib::load::Loaded;

use crate::output::{OutputFormat, print_json};

pub fn cmd_read(pipeline: &Pipeline, name: &str, output: OutputFormat) -> Result<()> {
  let loaded = pipeline.read(name).with_context(|| format!("Failed to read {}", name))?;

  if output.is_json() {
    return print_json(&loaded);
  }

  match loaded {
    Loaded::Value(value) => print_json(&value)?,
    Loaded::Path(path) => println!("{}", path.display()),
    Loaded::Paths(paths) => {
      for path in paths {
        println!("{}", path.display());
      }
    }
  }

  Ok(())
}
