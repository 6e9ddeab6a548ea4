//! Per-invocation execution context handed in by the caller.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Mode flags and bindings for one dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchContext {
  /// Dry-run: report what would happen, mutate nothing.
  #[serde(default)]
  pub check_mode: bool,
  /// Caller's base directory for resolving relative sources.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub base_dir: Option<PathBuf>,
  /// Environment bindings passed through to the remote module.
  #[serde(default)]
  pub environment: BTreeMap<String, String>,
}

impl DispatchContext {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn check_mode(mut self, on: bool) -> Self {
    self.check_mode = on;
    self
  }

  pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
    self.base_dir = Some(dir.into());
    self
  }

  pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.environment.insert(key.into(), value.into());
    self
  }
}
