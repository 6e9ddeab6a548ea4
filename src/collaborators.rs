//! Seams to the outside world. The dispatcher receives these at construction time.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::DispatchError;
use crate::types::{
  BootstrapRequest, DispatchContext, ExecutionResult, ModuleInvocation, StagingRequest,
  StagingResult,
};

/// Handle to one managed target.
#[async_trait]
pub trait Connection: Send + Sync {
  /// Display name of the target, used in logs and reports.
  fn host(&self) -> &str;

  /// Allocates a fresh working directory on the target. Called at most once per dispatch.
  async fn make_work_dir(&self) -> Result<PathBuf, DispatchError>;
}

/// Places a local file or directory on the target.
#[async_trait]
pub trait FileStager: Send + Sync {
  async fn stage(
    &self,
    conn: &dyn Connection,
    request: &StagingRequest,
  ) -> Result<StagingResult, DispatchError>;
}

/// Runs a module on the target.
#[async_trait]
pub trait ModuleExecutor: Send + Sync {
  async fn execute(
    &self,
    conn: &dyn Connection,
    work_dir: &Path,
    invocation: &ModuleInvocation,
    ctx: &DispatchContext,
  ) -> Result<ExecutionResult, DispatchError>;
}

/// Stages every declared source and then runs the configuration step itself.
#[async_trait]
pub trait DependencyBootstrapper: Send + Sync {
  async fn bootstrap(
    &self,
    conn: &dyn Connection,
    work_dir: &Path,
    request: &BootstrapRequest,
    ctx: &DispatchContext,
  ) -> Result<ExecutionResult, DispatchError>;
}
