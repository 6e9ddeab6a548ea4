//! Prepare-then-execute orchestration for one managed node.
//!
//! Check mode short-circuits under either strategy, before a working directory is allocated.
//!
//! - [DispatchStrategy::DirectStaging]: stage the support library into the working directory,
//!   stop on staging failure, then run the module once with the caller's original arguments.
//! - [DispatchStrategy::Bootstrap]: resolve the declared sources and hand them, with the effective
//!   payload, to a [DependencyBootstrapper]; its result is returned as is.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::collaborators::{Connection, DependencyBootstrapper, FileStager, ModuleExecutor};
use crate::config::{DispatchStrategy, DispatcherConfig};
use crate::error::DispatchError;
use crate::types::{
  BootstrapRequest, ConfigurationPayload, DispatchContext, ExecutionResult, ModuleArgs,
  ModuleInvocation, StagingRequest,
};

/// Collaborators handed to [ConfigDispatcher::new]. Only those the strategy needs are required.
#[derive(Clone, Default)]
pub struct Collaborators {
  pub stager: Option<Arc<dyn FileStager>>,
  pub executor: Option<Arc<dyn ModuleExecutor>>,
  pub bootstrapper: Option<Arc<dyn DependencyBootstrapper>>,
}

impl Collaborators {
  pub fn direct(stager: Arc<dyn FileStager>, executor: Arc<dyn ModuleExecutor>) -> Self {
    Self {
      stager: Some(stager),
      executor: Some(executor),
      bootstrapper: None,
    }
  }

  pub fn bootstrap(bootstrapper: Arc<dyn DependencyBootstrapper>) -> Self {
    Self {
      bootstrapper: Some(bootstrapper),
      ..Self::default()
    }
  }

  pub fn with_bootstrapper(mut self, bootstrapper: Arc<dyn DependencyBootstrapper>) -> Self {
    self.bootstrapper = Some(bootstrapper);
    self
  }
}

enum Plan {
  Direct {
    stager: Arc<dyn FileStager>,
    executor: Arc<dyn ModuleExecutor>,
  },
  Bootstrap {
    bootstrapper: Arc<dyn DependencyBootstrapper>,
  },
}

/// Orchestrates one dispatch per call. Holds no per-dispatch state.
pub struct ConfigDispatcher {
  config: DispatcherConfig,
  plan: Plan,
}

impl ConfigDispatcher {
  pub fn new(
    config: DispatcherConfig,
    collaborators: Collaborators,
  ) -> Result<Self, DispatchError> {
    config.validate()?;
    let plan = match config.strategy {
      DispatchStrategy::DirectStaging => match (collaborators.stager, collaborators.executor) {
        (Some(stager), Some(executor)) => Plan::Direct { stager, executor },
        _ => {
          return Err(DispatchError::Config(
            "direct staging needs a file stager and a module executor".to_string(),
          ));
        }
      },
      DispatchStrategy::Bootstrap => match collaborators.bootstrapper {
        Some(bootstrapper) => Plan::Bootstrap { bootstrapper },
        None => {
          return Err(DispatchError::Config(
            "bootstrap strategy needs a dependency bootstrapper".to_string(),
          ));
        }
      },
    };
    Ok(Self { config, plan })
  }

  pub fn config(&self) -> &DispatcherConfig {
    &self.config
  }

  pub fn strategy(&self) -> DispatchStrategy {
    self.config.strategy
  }

  /// Runs one dispatch against `conn`.
  ///
  /// `work_dir` of `None` (or an empty path) allocates one from the connection, once.
  /// Collaborator failures come back as an unsuccessful [ExecutionResult]; `Err` means the
  /// dispatch could not be carried out at all.
  #[instrument(
    level = "trace",
    skip_all,
    fields(host = conn.host(), strategy = %self.config.strategy)
  )]
  pub async fn dispatch(
    &self,
    conn: &dyn Connection,
    work_dir: Option<&Path>,
    args: &ModuleArgs,
    ctx: &DispatchContext,
  ) -> Result<ExecutionResult, DispatchError> {
    let payload = ConfigurationPayload::resolve(args);
    debug!(host = conn.host(), payload = ?payload, "resolved configuration payload");

    if ctx.check_mode {
      info!(host = conn.host(), "check mode: nothing staged or run");
      return Ok(ExecutionResult::skipped("check mode not supported for this module"));
    }

    match &self.plan {
      Plan::Direct { stager, executor } => {
        self
          .dispatch_direct(conn, work_dir, args, ctx, stager.as_ref(), executor.as_ref())
          .await
      }
      Plan::Bootstrap { bootstrapper } => {
        self
          .dispatch_bootstrap(conn, work_dir, payload, ctx, bootstrapper.as_ref())
          .await
      }
    }
  }

  async fn dispatch_direct(
    &self,
    conn: &dyn Connection,
    work_dir: Option<&Path>,
    args: &ModuleArgs,
    ctx: &DispatchContext,
    stager: &dyn FileStager,
    executor: &dyn ModuleExecutor,
  ) -> Result<ExecutionResult, DispatchError> {
    let work_dir = ensure_work_dir(conn, work_dir).await?;
    let request = self.support_library_request(&work_dir)?;

    info!(
      host = conn.host(),
      src = %request.local_path.display(),
      dest = %request.destination().display(),
      "staging support library"
    );
    let staged = stager.stage(conn, &request).await?;
    if staged.is_failure() {
      warn!(
        host = conn.host(),
        error = staged.error.as_deref().unwrap_or("unknown"),
        "staging failed; module not run"
      );
      return Ok(ExecutionResult::from(staged));
    }

    let invocation = ModuleInvocation::new(&self.config.module_name, args);
    info!(host = conn.host(), module = %invocation.module_name, "running module");
    let result = executor.execute(conn, &work_dir, &invocation, ctx).await?;
    info!(
      host = conn.host(),
      module = %invocation.module_name,
      status = %result.status(),
      "module finished"
    );
    Ok(result)
  }

  async fn dispatch_bootstrap(
    &self,
    conn: &dyn Connection,
    work_dir: Option<&Path>,
    payload: ConfigurationPayload,
    ctx: &DispatchContext,
    bootstrapper: &dyn DependencyBootstrapper,
  ) -> Result<ExecutionResult, DispatchError> {
    let work_dir = ensure_work_dir(conn, work_dir).await?;
    let request = BootstrapRequest {
      sources: self.config.resolved_sources(ctx.base_dir.as_deref()),
      skip_indirection: true,
      payload,
    };
    info!(
      host = conn.host(),
      sources = request.sources.len(),
      "delegating to bootstrapper"
    );
    bootstrapper.bootstrap(conn, &work_dir, &request, ctx).await
  }

  fn support_library_request(&self, work_dir: &Path) -> Result<StagingRequest, DispatchError> {
    let local_path = self.config.support_library_path();
    let destination_name = local_path
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .ok_or_else(|| {
        DispatchError::Config(format!(
          "support library path {} has no base name",
          local_path.display()
        ))
      })?;
    Ok(StagingRequest {
      local_path,
      destination_dir: work_dir.to_path_buf(),
      destination_name,
      follow_links: true,
    })
  }
}

/// Uses the caller's working directory, or asks the connection for one.
#[instrument(level = "trace", skip(conn), fields(host = conn.host()))]
async fn ensure_work_dir(
  conn: &dyn Connection,
  supplied: Option<&Path>,
) -> Result<PathBuf, DispatchError> {
  match supplied {
    Some(dir) if !dir.as_os_str().is_empty() => Ok(dir.to_path_buf()),
    _ => {
      let dir = conn.make_work_dir().await?;
      debug!(host = conn.host(), work_dir = %dir.display(), "allocated working directory");
      Ok(dir)
    }
  }
}
