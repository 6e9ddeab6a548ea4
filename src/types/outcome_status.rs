//! Coarse outcome of a staging or execution step.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse outcome of a staging or execution step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
  Success,
  Skipped,
  Fail,
}

impl OutcomeStatus {
  pub(crate) fn from_flags(success: bool, skipped: bool) -> Self {
    match (success, skipped) {
      (false, _) => OutcomeStatus::Fail,
      (true, true) => OutcomeStatus::Skipped,
      (true, false) => OutcomeStatus::Success,
    }
  }
}

impl fmt::Display for OutcomeStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      OutcomeStatus::Success => write!(f, "success"),
      OutcomeStatus::Skipped => write!(f, "skipped"),
      OutcomeStatus::Fail => write!(f, "fail"),
    }
  }
}
