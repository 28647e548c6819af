use serde_json::json;

use rixpress_lib::dag::{DagError, DependencyGraph, to_dot};

use super::common::Project;

#[test]
fn dag_file_to_ci_stages_and_dot() {
  let project = Project::new();
  let path = project.write_dag(&json!({
    "derivations": [
      { "deriv_name": ["raw"], "depends": [], "type": ["rxp_r"] },
      { "deriv_name": ["clean"], "depends": ["raw"], "type": ["rxp_py"] },
      { "deriv_name": ["features"], "depends": ["raw"], "type": ["rxp_py"] },
      { "deriv_name": ["model"], "depends": ["clean", "features"], "type": ["rxp_py"] },
      { "deriv_name": ["report"], "depends": ["model", "upstream_tool"], "type": ["rxp_qmd"] }
    ]
  }));

  let graph = DependencyGraph::load(&path).unwrap();
  assert_eq!(graph.nodes.len(), 5);
  assert_eq!(graph.edges.len(), 6);
  assert_eq!(graph.dangling_edges().len(), 1);

  let order = graph.ci_order().unwrap();
  assert_eq!(order.order(), vec!["raw", "clean", "features", "model", "report"]);
  assert_eq!(order.stage_count(), 4);

  let dot = to_dot(&graph);
  assert!(dot.contains(r#""upstream_tool" -> "report";"#));
  assert!(dot.contains(r#""raw" [label="raw"];"#));
}

#[test]
fn cycle_through_three_nodes() {
  let project = Project::new();
  let path = project.write_dag(&json!({
    "derivations": [
      { "deriv_name": ["start"], "depends": [] },
      { "deriv_name": ["a"], "depends": ["c", "start"] },
      { "deriv_name": ["b"], "depends": ["a"] },
      { "deriv_name": ["c"], "depends": ["b"] }
    ]
  }));

  let err = DependencyGraph::load(&path).unwrap().ci_order().unwrap_err();
  match err {
    DagError::CycleDetected { remaining } => assert_eq!(remaining, vec!["a", "b", "c"]),
    other => panic!("unexpected error: {other}"),
  }
}
