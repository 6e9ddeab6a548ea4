//! Module runner: spawns `<modules_dir>/<module_name>` with the invocation as JSON on stdin and
//! reads a JSON result from stdout.
//!
//! Success means exit status 0 and no `"failed": true` in the result. `"changed"` is copied
//! through. Environment bindings from the context are exported to the child, plus
//! `NGINX_DISPATCH_WORK_DIR`.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, instrument};

use crate::collaborators::{Connection, ModuleExecutor};
use crate::error::DispatchError;
use crate::types::{DispatchContext, ExecutionResult, ModuleInvocation};

pub const ENV_WORK_DIR: &str = "NGINX_DISPATCH_WORK_DIR";

/// What the module reads from stdin.
#[derive(Serialize)]
struct ModuleRequest<'a> {
  #[serde(flatten)]
  invocation: &'a ModuleInvocation,
  check_mode: bool,
  work_dir: &'a Path,
}

/// [ModuleExecutor] that runs module executables found in a local directory.
#[derive(Debug, Clone)]
pub struct CommandModuleExecutor {
  modules_dir: PathBuf,
  /// Program that runs the module file, e.g. `sh` or `python3`. `None` executes it directly.
  interpreter: Option<PathBuf>,
}

impl CommandModuleExecutor {
  pub fn new(modules_dir: impl Into<PathBuf>) -> Self {
    Self {
      modules_dir: modules_dir.into(),
      interpreter: None,
    }
  }

  pub fn with_interpreter(mut self, interpreter: impl Into<PathBuf>) -> Self {
    self.interpreter = Some(interpreter.into());
    self
  }

  fn command(&self, program: &Path) -> Command {
    match &self.interpreter {
      Some(interpreter) => {
        let mut cmd = Command::new(interpreter);
        cmd.arg(program);
        cmd
      }
      None => Command::new(program),
    }
  }

  fn module_path(&self, module_name: &str) -> PathBuf {
    self.modules_dir.join(module_name)
  }
}

#[async_trait]
impl ModuleExecutor for CommandModuleExecutor {
  #[instrument(
    level = "trace",
    skip_all,
    fields(host = conn.host(), module = %invocation.module_name)
  )]
  async fn execute(
    &self,
    conn: &dyn Connection,
    work_dir: &Path,
    invocation: &ModuleInvocation,
    ctx: &DispatchContext,
  ) -> Result<ExecutionResult, DispatchError> {
    let program = self.module_path(&invocation.module_name);
    let stdin_json = serde_json::to_vec(&ModuleRequest {
      invocation,
      check_mode: ctx.check_mode,
      work_dir,
    })?;

    let spawn_err = |source| DispatchError::Spawn {
      module: invocation.module_name.clone(),
      source,
    };
    let mut child = self
      .command(&program)
      .current_dir(work_dir)
      .envs(&ctx.environment)
      .env(ENV_WORK_DIR, work_dir)
      .stdin(Stdio::piped())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .spawn()
      .map_err(spawn_err)?;

    // Feed stdin while collecting output; a module may exit without reading it.
    let stdin = child.stdin.take();
    let feed = async move {
      let Some(mut stdin) = stdin else {
        return Ok(());
      };
      stdin.write_all(&stdin_json).await?;
      stdin.write_all(b"\n").await
    };
    let (fed, output) = tokio::join!(feed, child.wait_with_output());
    let output = output.map_err(spawn_err)?;
    match fed {
      Err(e) if e.kind() != io::ErrorKind::BrokenPipe => return Err(spawn_err(e)),
      _ => {}
    }
    debug!(
      host = conn.host(),
      module = %invocation.module_name,
      status = ?output.status.code(),
      "module exited"
    );

    interpret_output(
      &invocation.module_name,
      output.status.success(),
      output.status.code(),
      &output.stdout,
      &output.stderr,
    )
  }
}

/// Maps a module's exit status and output onto an [ExecutionResult].
pub(crate) fn interpret_output(
  module: &str,
  exited_ok: bool,
  code: Option<i32>,
  stdout: &[u8],
  stderr: &[u8],
) -> Result<ExecutionResult, DispatchError> {
  let exit_msg = || {
    code
      .map(|c| format!("module {module} exited with status {c}"))
      .unwrap_or_else(|| format!("module {module} terminated by signal"))
  };
  let text = String::from_utf8_lossy(stdout);
  let payload: Value = match serde_json::from_str(text.trim()) {
    Ok(v) => v,
    Err(_) if !exited_ok => {
      let stderr = String::from_utf8_lossy(stderr);
      let mut result = ExecutionResult::fail(exit_msg());
      result.payload = serde_json::json!({ "stdout": text.trim(), "stderr": stderr.trim() });
      return Ok(result);
    }
    Err(e) => {
      return Err(DispatchError::ModuleOutput {
        module: module.to_string(),
        reason: e.to_string(),
      });
    }
  };

  let failed = payload.get("failed").and_then(Value::as_bool).unwrap_or(false);
  let changed = payload.get("changed").and_then(Value::as_bool).unwrap_or(false);
  if exited_ok && !failed {
    return Ok(ExecutionResult::success(payload).with_changed(changed));
  }
  let error = payload
    .get("msg")
    .and_then(Value::as_str)
    .map(String::from)
    .unwrap_or_else(exit_msg);
  let mut result = ExecutionResult::fail(error).with_changed(changed);
  result.payload = payload;
  Ok(result)
}
