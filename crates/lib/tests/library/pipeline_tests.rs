use serde_json::json;
use serial_test::serial;

use rixpress_lib::load::{Loaded, Scope};
use rixpress_lib::resolve::{ResolveError, ResolvedTarget};
use rixpress_lib::{Config, Pipeline};

use super::common::Project;

fn pipeline(project: &Project) -> Pipeline {
  let config = Config {
    project_path: project.root(),
    store_prefix: project.store_prefix(),
    ..Config::default()
  };
  Pipeline::from_config(&config)
}

#[test]
fn most_recent_log_wins() {
  let project = Project::new();
  let old = project.store_file("aaa-data/data.json", r#"{"version": 1}"#);
  let new = project.store_file("bbb-data/data.json", r#"{"version": 2}"#);

  let old_log = project.write_log(
    "build_log_old.json",
    &json!([{ "derivation": "data", "path": old, "output": ["data.json"] }]),
  );
  project.write_log(
    "build_log_new.json",
    &json!([{ "derivation": "data", "path": new, "output": ["data.json"] }]),
  );
  let past = std::time::SystemTime::now() - std::time::Duration::from_secs(3600);
  std::fs::File::options()
    .write(true)
    .open(&old_log)
    .unwrap()
    .set_modified(past)
    .unwrap();

  let pipeline = pipeline(&project);
  assert_eq!(pipeline.read("data").unwrap(), Loaded::Value(json!({ "version": 2 })));
}

#[test]
fn load_binds_each_value_once() {
  let project = Project::new();
  let data = project.store_file("aaa-data/data.json", "[1, 2, 3]");
  let model = project.store_file("bbb-model/model.json", r#"{"coef": 0.5}"#);
  project.write_log(
    "build_log.json",
    &json!([
      { "derivation": "data", "path": data, "output": ["data.json"] },
      { "derivation": "model", "path": model, "output": ["model.json"] }
    ]),
  );

  let pipeline = pipeline(&project);
  let mut scope = Scope::new();
  pipeline.load("data", &mut scope).unwrap();
  pipeline.load("model", &mut scope).unwrap();

  assert_eq!(scope.len(), 2);
  assert_eq!(scope.get("data"), Some(&json!([1, 2, 3])));
  assert_eq!(scope.get("model"), Some(&json!({ "coef": 0.5 })));
}

#[test]
fn alias_keys_resolve_like_canonical_ones() {
  let project = Project::new();
  let dir = project.store_file("ccc-plot/plot.png", "png");
  project.write_log(
    "build_log.json",
    &json!([{ "deriv": ["plot"], "store_path": [dir], "output": "plot.png" }]),
  );

  let resolved = pipeline(&project).resolve("plot").unwrap();
  assert_eq!(resolved, ResolvedTarget::Single(dir.join("plot.png")));
}

#[test]
fn unknown_name_is_not_found() {
  let project = Project::new();
  project.write_log("build_log.json", &json!([]));

  let err = pipeline(&project).resolve("missing").unwrap_err();
  assert!(matches!(err, ResolveError::NotFound(ref n) if n == "missing"));
  assert!(err.to_string().contains("rxp inspect"));
}

#[test]
#[serial]
fn config_from_env_drives_pipeline() {
  let project = Project::new();
  let data = project.store_file("aaa-data/data.json", r#""hello""#);
  project.write_log(
    "build_log_2024.json",
    &json!([{ "derivation": "data", "path": data, "output": ["data.json"] }]),
  );

  temp_env::with_vars(
    [
      ("RIXPRESS_PROJECT_DIR", Some(project.root().to_str().unwrap())),
      ("RIXPRESS_STORE_PREFIX", Some(project.store_prefix().as_str())),
      ("RIXPRESS_WHICH_LOG", Some("2024")),
      ("RIXPRESS_LOADERS", None),
    ],
    || {
      let config = Config::from_env().unwrap();
      let pipeline = Pipeline::from_config(&config);
      assert_eq!(pipeline.read("data").unwrap(), Loaded::Value(json!("hello")));
    },
  );
}
