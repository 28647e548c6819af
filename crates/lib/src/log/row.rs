//! A single row of the build log.
//!
//! The build tool is not strict about key names, so a row carries one optional
//! field per accepted key and the accessors below resolve aliases in a fixed
//! order:
//!
//! | logical field | keys, in priority order                          |
//! |---------------|--------------------------------------------------|
//! | identifier    | `derivation`, `deriv`, `name`                    |
//! | base path     | `path`, `store_path`, `path_store`, `output_path`|
//! | outputs       | `output`                                         |
//!
//! Every field may be a scalar or a list. Null entries are dropped and
//! non-string scalars are stringified.
//!
//! The identifier comes from the first identifier key present in the row,
//! even when its value is null; such a row has no identifiers and never
//! matches a lookup.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogRow {
  #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
  pub derivation: Option<Value>,
  #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
  pub deriv: Option<Value>,
  #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
  pub name: Option<Value>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub path: Option<Value>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub store_path: Option<Value>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub path_store: Option<Value>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub output_path: Option<Value>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub output: Option<Value>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub build_success: Option<Value>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error_message: Option<Value>,
}

impl LogRow {
  /// Convenience constructor for the common `name`/`path`/`output` shape.
  pub fn new(name: &str, path: &str, outputs: Option<&[&str]>) -> Self {
    Self {
      name: Some(Value::from(name)),
      path: Some(Value::from(path)),
      output: outputs.map(|outs| Value::from(outs.to_vec())),
      ..Self::default()
    }
  }

  /// Identifiers of this row, taken from the first identifier key present.
  pub fn identifiers(&self) -> Vec<String> {
    [&self.derivation, &self.deriv, &self.name]
      .into_iter()
      .flatten()
      .next()
      .map(value_strings)
      .unwrap_or_default()
  }

  pub fn has_identifier(&self, name: &str) -> bool {
    self.identifiers().iter().any(|id| id == name)
  }

  /// Base store path: the first aliased key holding a non-empty string.
  pub fn base_path(&self) -> Option<String> {
    [&self.path, &self.store_path, &self.path_store, &self.output_path]
      .into_iter()
      .flatten()
      .filter_map(|v| value_strings(v).into_iter().next())
      .find(|s| !s.is_empty())
  }

  /// Output entries, or `None` when the row has no output field at all.
  pub fn outputs(&self) -> Option<Vec<String>> {
    self.output.as_ref().map(value_strings)
  }

  pub fn build_success(&self) -> Option<bool> {
    match self.build_success.as_ref()? {
      Value::Bool(b) => Some(*b),
      Value::Array(items) => items.iter().find_map(Value::as_bool),
      _ => None,
    }
  }

  pub fn error_message(&self) -> Option<String> {
    self
      .error_message
      .as_ref()
      .and_then(|v| value_strings(v).into_iter().next())
      .filter(|s| !s.is_empty())
  }
}

/// `Some(Value::Null)` for a key written as null, `None` only when absent.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
  D: Deserializer<'de>,
{
  Value::deserialize(deserializer).map(Some)
}

/// Flatten a scalar-or-list value into strings.
pub(crate) fn value_strings(value: &Value) -> Vec<String> {
  match value {
    Value::Null => Vec::new(),
    Value::Array(items) => items.iter().filter(|v| !v.is_null()).map(scalar_string).collect(),
    other => vec![scalar_string(other)],
  }
}

fn scalar_string(value: &Value) -> String {
  match value {
    Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}
