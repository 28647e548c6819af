//! Named values bound by [`ArtifactLoader::load_and_bind`](super::ArtifactLoader::load_and_bind).
//!
//! The caller owns the scope and decides where loaded values live; nothing is
//! injected behind its back.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindError {
  #[error("cannot bind a value under {0:?}")]
  InvalidName(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Scope {
  values: BTreeMap<String, Value>,
}

impl Scope {
  pub fn new() -> Self {
    Self::default()
  }

  /// Bind `value` under `name`, replacing any previous binding.
  ///
  /// Empty names and path-like names are rejected.
  pub fn bind(&mut self, name: &str, value: Value) -> Result<(), BindError> {
    if name.is_empty() || name.contains('/') || name.contains('\\') {
      return Err(BindError::InvalidName(name.to_string()));
    }
    self.values.insert(name.to_string(), value);
    Ok(())
  }

  pub fn get(&self, name: &str) -> Option<&Value> {
    self.values.get(name)
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
    self.values.iter()
  }
}
