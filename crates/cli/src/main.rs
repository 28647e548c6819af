mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use rixpress_lib::config::LoaderSpec;
use rixpress_lib::consts::DOT_FILENAME;
use rixpress_lib::{Config, Pipeline};

use output::{OutputFormat, print_error};

/// rxp - inspect and read the outputs of a reproducible analytics pipeline
#[derive(Parser)]
#[command(name = "rxp")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  /// Pipeline project root (the directory containing `_rixpress/`)
  #[arg(long, global = true)]
  project: Option<PathBuf>,

  /// Use the build log whose file name contains this text
  #[arg(long, global = true)]
  which_log: Option<String>,

  /// Names starting with this prefix are treated as store paths
  #[arg(long, global = true)]
  store_prefix: Option<String>,

  /// External loader for an artifact extension, as EXT=COMMAND (repeatable)
  #[arg(long = "loader", global = true, value_name = "EXT=COMMAND")]
  loaders: Vec<LoaderSpec>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Print the store path(s) of a derivation's outputs
  Resolve {
    /// Derivation name or literal store path
    name: String,
  },

  /// Resolve a derivation and print its loaded value
  Read {
    /// Derivation name or literal store path
    name: String,
  },

  /// Show the rows of a build log
  Inspect {
    /// Only show derivations that failed to build
    #[arg(long)]
    failed: bool,
  },

  /// List the project's build logs, most recent first
  Logs,

  /// Show the dependency graph
  Graph {
    /// Path to the dependency description (default: _rixpress/dag.json)
    #[arg(long)]
    dag: Option<PathBuf>,

    /// Leave out edges whose endpoints are not declared derivations
    #[arg(long)]
    drop_dangling: bool,
  },

  /// Print the CI stages of the pipeline in dependency order
  Order {
    /// Path to the dependency description (default: _rixpress/dag.json)
    #[arg(long)]
    dag: Option<PathBuf>,
  },

  /// Export the dependency graph as DOT for CI
  DagForCi {
    /// Path to the dependency description (default: _rixpress/dag.json)
    #[arg(long)]
    dag: Option<PathBuf>,

    /// Where to write the DOT file (default: _rixpress/dag.dot)
    #[arg(long)]
    out: Option<PathBuf>,
  },
}

fn init_tracing(verbose: bool) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
    if verbose {
      EnvFilter::new("debug")
    } else {
      EnvFilter::new("warn")
    }
  });

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

/// Environment first, then command-line flags on top.
fn build_config(cli: &Cli) -> Result<Config> {
  let mut config = Config::from_env().context("Invalid configuration in environment")?;

  if let Some(project) = &cli.project {
    config.project_path = project.clone();
  }
  if let Some(which_log) = &cli.which_log {
    config.which_log = Some(which_log.clone());
  }
  if let Some(prefix) = &cli.store_prefix {
    config.store_prefix = prefix.clone();
  }
  config.loaders.extend(cli.loaders.iter().cloned());

  debug!(
    project = %config.project_path.display(),
    store_prefix = %config.store_prefix,
    loaders = config.loaders.len(),
    "configuration loaded"
  );
  Ok(config)
}

fn pipeline_with_dag(config: &Config, dag: Option<PathBuf>) -> Pipeline {
  let pipeline = Pipeline::from_config(config);
  match dag {
    Some(path) => pipeline.with_dag_path(path),
    None => pipeline,
  }
}

fn run(cli: Cli) -> Result<()> {
  let config = build_config(&cli)?;
  let output = cli.output;

  match cli.command {
    Commands::Resolve { name } => cmd::cmd_resolve(&Pipeline::from_config(&config), &name, output),
    Commands::Read { name } => cmd::cmd_read(&Pipeline::from_config(&config), &name, output),
    Commands::Inspect { failed } => cmd::cmd_inspect(&Pipeline::from_config(&config), failed, output),
    Commands::Logs => cmd::cmd_logs(&config, output),
    Commands::Graph { dag, drop_dangling } => cmd::cmd_graph(&pipeline_with_dag(&config, dag), drop_dangling, output),
    Commands::Order { dag } => cmd::cmd_order(&pipeline_with_dag(&config, dag), output),
    Commands::DagForCi { dag, out } => {
      let out = out.unwrap_or_else(|| config.project_dir().join(DOT_FILENAME));
      cmd::cmd_dag_for_ci(&pipeline_with_dag(&config, dag), out, output)
    }
  }
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  match run(cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      print_error(&format!("{:#}", e));
      ExitCode::FAILURE
    }
  }
}
