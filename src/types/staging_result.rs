//! File-placement request and outcome.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::OutcomeStatus;

/// Request to place a local file or directory on the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagingRequest {
  pub local_path: PathBuf,
  pub destination_dir: PathBuf,
  /// Base name of the copy inside `destination_dir`.
  pub destination_name: String,
  pub follow_links: bool,
}

impl StagingRequest {
  /// Full destination path on the target.
  pub fn destination(&self) -> PathBuf {
    self.destination_dir.join(&self.destination_name)
  }
}

/// Outcome of one remote file-placement action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagingResult {
  pub success: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
  #[serde(default)]
  pub skipped: bool,
  #[serde(default)]
  pub changed: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub dest: Option<PathBuf>,
}

impl StagingResult {
  pub fn staged(dest: impl Into<PathBuf>, changed: bool) -> Self {
    Self {
      success: true,
      changed,
      dest: Some(dest.into()),
      ..Self::default()
    }
  }

  pub fn skipped() -> Self {
    Self {
      success: true,
      skipped: true,
      ..Self::default()
    }
  }

  pub fn fail(error: impl Into<String>) -> Self {
    Self {
      success: false,
      error: Some(error.into()),
      ..Self::default()
    }
  }

  pub fn is_failure(&self) -> bool {
    !self.success
  }

  pub fn status(&self) -> OutcomeStatus {
    OutcomeStatus::from_flags(self.success, self.skipped)
  }
}
