//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use tempfile::TempDir;

/// Isolated pipeline project.
///
/// Each test gets its own temporary directory holding a project root with
/// `_rixpress/` and a fake store the build log points into.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn empty() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  /// A project where `data` produced `data.json` and `model` produced two
  /// files, with a matching `dag.json`.
  pub fn with_pipeline() -> Self {
    let env = Self::empty();
    env.write_store_file("aaa-data/data.json", r#"{"rows": [1, 2, 3]}"#);
    env.write_store_file("bbb-model/model.pkl", "binary");
    env.write_store_file("bbb-model/model.meta", "meta");

    let log = serde_json::json!([
      { "derivation": "data", "path": env.store_path("aaa-data"), "output": ["data.json"], "build_success": true },
      { "derivation": "model", "path": env.store_path("bbb-model"), "output": ["model.pkl", "model.meta"], "build_success": true },
      { "derivation": "report", "path": null, "build_success": false, "error_message": "builder failed with exit code 1" }
    ]);
    env.write_log("build_log.json", &log);

    env.write_file(
      "project/_rixpress/dag.json",
      r#"{"derivations": [
        {"deriv_name": ["data"], "depends": [], "type": ["rxp_py"], "pipeline_group": ["ETL"]},
        {"deriv_name": ["model"], "depends": ["data"], "type": ["rxp_py"]},
        {"deriv_name": ["report"], "depends": ["model", "data"], "type": ["rxp_qmd"]}
      ]}"#,
    );
    env
  }

  /// Write a file relative to the temp directory.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  pub fn write_store_file(&self, relative_path: &str, content: &str) {
    self.write_file(&format!("store/{}", relative_path), content);
  }

  pub fn write_log(&self, name: &str, rows: &Value) {
    self.write_file(&format!("project/_rixpress/{}", name), &rows.to_string());
  }

  /// Project root (contains `_rixpress/`).
  pub fn project_path(&self) -> PathBuf {
    let p = self.temp.path().join("project");
    std::fs::create_dir_all(&p).unwrap();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  /// Root of the fake store.
  pub fn store_root(&self) -> PathBuf {
    let p = self.temp.path().join("store");
    std::fs::create_dir_all(&p).unwrap();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  pub fn store_path(&self, entry: &str) -> String {
    self.store_root().join(entry).display().to_string()
  }

  /// Get a pre-configured Command for the rxp binary.
  ///
  /// Sets `RIXPRESS_PROJECT_DIR` and `RIXPRESS_STORE_PREFIX` to the isolated
  /// project and store, and clears anything else that could leak in.
  pub fn rxp_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("rxp");
    cmd.env("RIXPRESS_PROJECT_DIR", self.project_path());
    cmd.env("RIXPRESS_STORE_PREFIX", format!("{}/", self.store_root().display()));
    cmd.env_remove("RIXPRESS_WHICH_LOG");
    cmd.env_remove("RIXPRESS_LOADERS");
    cmd.env_remove("RUST_LOG");
    cmd
  }
}
