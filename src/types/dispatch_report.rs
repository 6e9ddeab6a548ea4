//! Persisted record of one dispatch.

use serde::{Deserialize, Serialize};

use super::ExecutionResult;
use crate::config::DispatchStrategy;

/// Persisted record of one dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchReport {
  pub host: String,
  pub module: String,
  pub strategy: DispatchStrategy,
  pub result: ExecutionResult,
}
