use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn resolve_single_output() {
  let env = TestEnv::with_pipeline();

  env
    .rxp_cmd()
    .args(["resolve", "data"])
    .assert()
    .success()
    .stdout(predicate::str::contains("aaa-data"))
    .stdout(predicate::str::contains("data.json"));
}

#[test]
fn resolve_multiple_outputs_prints_each_path() {
  let env = TestEnv::with_pipeline();

  let assert = env.rxp_cmd().args(["resolve", "model"]).assert().success();
  let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
  let lines: Vec<&str> = stdout.lines().collect();
  assert_eq!(lines.len(), 2);
  assert!(lines[0].ends_with("model.pkl"));
  assert!(lines[1].ends_with("model.meta"));
}

#[test]
fn resolve_json_output() {
  let env = TestEnv::with_pipeline();

  let assert = env.rxp_cmd().args(["resolve", "model", "-o", "json"]).assert().success();
  let value: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
  assert_eq!(value.as_array().map(Vec::len), Some(2));
}

#[test]
fn resolve_unknown_target_fails() {
  let env = TestEnv::with_pipeline();

  env
    .rxp_cmd()
    .args(["resolve", "nope"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("no derivation called"));
}

#[test]
fn resolve_literal_store_path_skips_log() {
  let env = TestEnv::empty();
  env.write_store_file("ccc-plot/plot.png", "png");

  env
    .rxp_cmd()
    .args(["resolve", &env.store_path("ccc-plot")])
    .assert()
    .success()
    .stdout(predicate::str::contains("plot.png"));
}

#[test]
fn resolve_without_logs_fails() {
  let env = TestEnv::empty();

  env
    .rxp_cmd()
    .args(["resolve", "data"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to resolve data"));
}

#[test]
fn which_log_selects_older_log() {
  let env = TestEnv::with_pipeline();
  env.write_store_file("ddd-data/data.json", "[]");
  env.write_log(
    "build_log_20240101.json",
    &serde_json::json!([{ "derivation": "data", "path": env.store_path("ddd-data"), "output": ["data.json"] }]),
  );

  env
    .rxp_cmd()
    .args(["resolve", "data", "--which-log", "20240101"])
    .assert()
    .success()
    .stdout(predicate::str::contains("ddd-data"));

  env
    .rxp_cmd()
    .args(["resolve", "data", "--which-log", "nomatch"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("nomatch"));
}

#[test]
fn inspect_lists_rows() {
  let env = TestEnv::with_pipeline();

  env
    .rxp_cmd()
    .arg("inspect")
    .assert()
    .success()
    .stdout(predicate::str::contains("data"))
    .stdout(predicate::str::contains("model"))
    .stdout(predicate::str::contains("builder failed"));
}

#[test]
fn inspect_failed_json() {
  let env = TestEnv::with_pipeline();

  let assert = env
    .rxp_cmd()
    .args(["inspect", "--failed", "-o", "json"])
    .assert()
    .success();
  let value: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
  let rows = value.as_array().unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0]["derivation"], serde_json::json!(["report"]));
  assert_eq!(rows[0]["build_success"], serde_json::json!(false));
}

#[test]
fn logs_lists_build_logs() {
  let env = TestEnv::with_pipeline();

  env
    .rxp_cmd()
    .arg("logs")
    .assert()
    .success()
    .stdout(predicate::str::contains("build_log.json"));
}
