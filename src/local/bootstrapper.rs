//! Bootstrapper built from a stager and an executor: stage every source, then run the module.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use crate::collaborators::{Connection, DependencyBootstrapper, FileStager, ModuleExecutor};
use crate::error::DispatchError;
use crate::types::{
  BootstrapRequest, DispatchContext, ExecutionResult, ModuleInvocation, StagingRequest,
};

/// [DependencyBootstrapper] that stages sources in order and stops at the first failure.
pub struct StagingBootstrapper {
  stager: Arc<dyn FileStager>,
  executor: Arc<dyn ModuleExecutor>,
  module_name: String,
}

impl StagingBootstrapper {
  pub fn new(
    stager: Arc<dyn FileStager>,
    executor: Arc<dyn ModuleExecutor>,
    module_name: impl Into<String>,
  ) -> Self {
    Self {
      stager,
      executor,
      module_name: module_name.into(),
    }
  }
}

#[async_trait]
impl DependencyBootstrapper for StagingBootstrapper {
  #[instrument(
    level = "trace",
    skip_all,
    fields(host = conn.host(), sources = request.sources.len())
  )]
  async fn bootstrap(
    &self,
    conn: &dyn Connection,
    work_dir: &Path,
    request: &BootstrapRequest,
    ctx: &DispatchContext,
  ) -> Result<ExecutionResult, DispatchError> {
    if ctx.check_mode {
      info!(host = conn.host(), "check mode: bootstrap skipped");
      return Ok(ExecutionResult::skipped("check mode not supported for this module"));
    }

    let mut changed = false;
    for source in &request.sources {
      let Some(name) = source.local_path.file_name() else {
        return Ok(ExecutionResult::fail(format!(
          "source {} has no base name",
          source.local_path.display()
        )));
      };
      let staging = StagingRequest {
        local_path: source.local_path.clone(),
        destination_dir: work_dir.to_path_buf(),
        destination_name: name.to_string_lossy().into_owned(),
        follow_links: true,
      };
      let staged = self.stager.stage(conn, &staging).await?;
      if staged.is_failure() {
        warn!(host = conn.host(), src = %source.local_path.display(), "bootstrap staging failed");
        return Ok(ExecutionResult::from(staged));
      }
      changed |= staged.changed;
    }

    let args = request.payload.to_module_args();
    let invocation = ModuleInvocation::new(&self.module_name, &args);
    let result = self.executor.execute(conn, work_dir, &invocation, ctx).await?;
    let module_changed = result.changed;
    Ok(result.with_changed(module_changed || changed))
  }
}
