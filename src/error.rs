//! Errors raised by the dispatch layer itself.
//!
//! Collaborator outcomes (a failed copy, a failed module run) are values carried in
//! [StagingResult](crate::types::StagingResult) and
//! [ExecutionResult](crate::types::ExecutionResult).
//! `DispatchError` is reserved for failures that stop the layer from asking a collaborator
//! at all, or from understanding its answer.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
  #[error("failed to allocate a working directory on {host}: {reason}")]
  WorkDir { host: String, reason: String },

  #[error("i/o error at {}: {source}", .path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to spawn module {module}: {source}")]
  Spawn {
    module: String,
    #[source]
    source: std::io::Error,
  },

  #[error("module {module} produced unreadable output: {reason}")]
  ModuleOutput { module: String, reason: String },

  #[error("invalid configuration: {0}")]
  Config(String),

  #[error(transparent)]
  Json(#[from] serde_json::Error),

  #[error("background task failed: {0}")]
  Join(String),
}

impl DispatchError {
  pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    DispatchError::Io {
      path: path.into(),
      source,
    }
  }
}
