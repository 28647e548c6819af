//! Turning a dependency description into a [`DependencyGraph`].

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::consts::DEFAULT_PIPELINE_GROUP;

use super::DagError;
use super::types::{DagDescription, DependencyGraph, Edge, Node, Wrapped};

/// The document shape before individual records are checked.
#[derive(Deserialize)]
struct RawDescription {
  #[serde(default)]
  derivations: Vec<Value>,
}

impl DagDescription {
  pub fn load(path: &Path) -> Result<Self, DagError> {
    let content = fs::read_to_string(path).map_err(|source| DagError::Read {
      path: path.to_path_buf(),
      source,
    })?;

    Self::parse(&content, path)
  }

  /// Parse a description; a malformed record is reported with its index.
  pub fn parse(content: &str, path: &Path) -> Result<Self, DagError> {
    let raw: RawDescription = serde_json::from_str(content).map_err(|source| DagError::Parse {
      path: path.to_path_buf(),
      source,
    })?;

    let derivations = raw
      .derivations
      .into_iter()
      .enumerate()
      .map(|(index, record)| {
        serde_json::from_value(record).map_err(|source| DagError::InvalidRecord {
          path: path.to_path_buf(),
          index,
          source,
        })
      })
      .collect::<Result<_, _>>()?;

    Ok(Self { derivations })
  }
}

impl DependencyGraph {
  pub fn from_description(description: &DagDescription) -> Result<Self, DagError> {
    build(description)
  }

  /// Read a `dag.json` document and build its graph.
  pub fn load(path: &Path) -> Result<Self, DagError> {
    build(&DagDescription::load(path)?)
  }
}

/// Build the node and edge lists.
///
/// The first record carrying a name defines that node; later records with the
/// same name still contribute their edges. Every listed dependency yields one
/// edge, declared or not.
pub fn build(description: &DagDescription) -> Result<DependencyGraph, DagError> {
  let mut graph = DependencyGraph::default();
  let mut seen = HashSet::new();

  for (index, record) in description.derivations.iter().enumerate() {
    let record = record.clone();
    let name = record
      .deriv_name
      .and_then(|n| n.into_first())
      .flatten()
      .filter(|n| !n.is_empty())
      .ok_or(DagError::MissingName { index })?;

    for dep in record.depends.map(|d| d.into_vec()).unwrap_or_default().into_iter().flatten() {
      graph.edges.push(Edge::new(dep, name.clone()));
    }

    if !seen.insert(name.clone()) {
      debug!(derivation = %name, index, "duplicate derivation, keeping first declaration");
      continue;
    }

    graph.nodes.push(Node {
      id: name,
      kind: first_string(record.kind),
      pipeline_group: first_string(record.pipeline_group).unwrap_or_else(|| DEFAULT_PIPELINE_GROUP.to_string()),
      pipeline_color: first_string(record.pipeline_color),
    });
  }

  Ok(graph)
}

fn first_string(field: Option<Wrapped<Option<String>>>) -> Option<String> {
  field.and_then(|w| w.into_first()).flatten()
}
