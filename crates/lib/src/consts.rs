//! Names and defaults shared across the crate.

/// Directory inside a project where the build tool leaves its logs and DAG.
pub const PROJECT_DIR: &str = "_rixpress";

/// Prefix of literal content-addressed store paths.
pub const DEFAULT_STORE_PREFIX: &str = "/nix/store/";

/// Build log file names start with this prefix and end in `.json`.
pub const BUILD_LOG_PREFIX: &str = "build_log";

pub const DAG_FILENAME: &str = "dag.json";

pub const DOT_FILENAME: &str = "dag.dot";

/// Pipeline group assigned to derivations that do not declare one.
pub const DEFAULT_PIPELINE_GROUP: &str = "default";
