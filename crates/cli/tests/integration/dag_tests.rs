use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn order_prints_stages() {
  let env = TestEnv::with_pipeline();

  env
    .rxp_cmd()
    .arg("order")
    .assert()
    .success()
    .stdout(predicate::str::contains("Stage 0: data"))
    .stdout(predicate::str::contains("Stage 1: model"))
    .stdout(predicate::str::contains("Stage 2: report"));
}

#[test]
fn order_json() {
  let env = TestEnv::with_pipeline();

  let assert = env.rxp_cmd().args(["order", "-o", "json"]).assert().success();
  let value: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
  assert_eq!(value["order"], serde_json::json!(["data", "model", "report"]));
}

#[test]
fn order_rejects_cycle() {
  let env = TestEnv::empty();
  env.write_file(
    "cyclic.json",
    r#"{"derivations": [{"deriv_name": ["a"], "depends": ["b"]}, {"deriv_name": ["b"], "depends": ["a"]}]}"#,
  );

  env
    .rxp_cmd()
    .arg("order")
    .arg("--dag")
    .arg(env.temp.path().join("cyclic.json"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("cycle"));
}

#[test]
fn graph_json_has_nodes_and_edges() {
  let env = TestEnv::with_pipeline();

  let assert = env.rxp_cmd().args(["graph", "-o", "json"]).assert().success();
  let value: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
  assert_eq!(value["nodes"].as_array().map(Vec::len), Some(3));
  assert_eq!(value["edges"].as_array().map(Vec::len), Some(3));
  assert_eq!(value["nodes"][0]["pipeline_group"], "ETL");
  assert_eq!(value["nodes"][1]["pipeline_group"], "default");
}

#[test]
fn graph_missing_dag_fails() {
  let env = TestEnv::empty();

  env
    .rxp_cmd()
    .arg("graph")
    .assert()
    .failure()
    .stderr(predicate::str::contains("dag.json"));
}

#[test]
fn dag_for_ci_writes_dot_file() {
  let env = TestEnv::with_pipeline();

  env
    .rxp_cmd()
    .arg("dag-for-ci")
    .assert()
    .success()
    .stdout(predicate::str::contains("Wrote"));

  let dot = std::fs::read_to_string(env.project_path().join("_rixpress").join("dag.dot")).unwrap();
  assert!(dot.starts_with("digraph"));
  assert!(dot.contains(r#""data" -> "model";"#));
  assert!(dot.contains(r#""model" -> "report";"#));
}

#[test]
fn dag_for_ci_custom_output() {
  let env = TestEnv::with_pipeline();
  let out = env.temp.path().join("ci").join("pipeline.dot");

  env.rxp_cmd().arg("dag-for-ci").arg("--out").arg(&out).assert().success();

  assert!(out.exists());
}
