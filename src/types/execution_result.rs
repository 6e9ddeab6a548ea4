//! Result of running the remote configuration module; the value a dispatch returns.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{OutcomeStatus, StagingResult};

/// Result of one dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
  pub success: bool,
  #[serde(default)]
  pub skipped: bool,
  #[serde(default)]
  pub changed: bool,
  /// Whatever the module reported back.
  #[serde(default)]
  pub payload: Value,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

impl ExecutionResult {
  pub fn success(payload: Value) -> Self {
    Self {
      success: true,
      skipped: false,
      changed: false,
      payload,
      error: None,
    }
  }

  /// Dry-run short-circuit: nothing was touched.
  pub fn skipped(reason: impl Into<String>) -> Self {
    Self {
      success: true,
      skipped: true,
      changed: false,
      payload: serde_json::json!({ "msg": reason.into() }),
      error: None,
    }
  }

  pub fn fail(error: impl Into<String>) -> Self {
    Self {
      success: false,
      skipped: false,
      changed: false,
      payload: Value::Null,
      error: Some(error.into()),
    }
  }

  pub fn with_changed(mut self, changed: bool) -> Self {
    self.changed = changed;
    self
  }

  pub fn status(&self) -> OutcomeStatus {
    OutcomeStatus::from_flags(self.success, self.skipped)
  }
}

impl From<StagingResult> for ExecutionResult {
  fn from(staging: StagingResult) -> Self {
    let payload = match &staging.dest {
      Some(dest) => serde_json::json!({ "dest": dest }),
      None => Value::Null,
    };
    Self {
      success: staging.success,
      skipped: staging.skipped,
      changed: staging.changed,
      payload,
      error: staging.error,
    }
  }
}
