//! CLI: stage the support library into a local target and run the nginx_config module.
//!
//! Usage: `nginx-dispatch [OPTIONS] --target <DIR>`
//! Example:
//! nginx-dispatch --install-root /opt/nginx-plugin --target /srv/node1 \
//!   --json-args '{"listen_port": 8080}'
//!
//! Prints the result as JSON. Exit status: 0 success (including skipped), 1 module or staging
//! failure, 2 when the dispatch could not run. A working directory allocated on the target is
//! removed afterwards unless `--keep-work-dir` is given.
//!
//! Set RUST_LOG=nginx_config_dispatch=trace for TRACE-level span enter/exit and events.

use clap::Parser;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use nginx_config_dispatch::local::{
  CommandModuleExecutor, LocalConnection, LocalFileStager, StagingBootstrapper,
};
use nginx_config_dispatch::report_io;
use nginx_config_dispatch::types::DispatchReport;
use nginx_config_dispatch::{
  Collaborators, ConfigDispatcher, Connection, DispatchContext, DispatchError, DispatchStrategy,
  DispatcherConfig, ExecutionResult, ModuleArgs,
};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

/// Stage the support library into a local target and run the configuration module.
#[derive(Parser, Debug)]
#[command(name = "nginx-dispatch")]
#[command(
  after_help = r#"Environment variables (override the matching flags when set):
  NGINX_DISPATCH_INSTALL_ROOT     Install root holding files/<library>.
  NGINX_DISPATCH_LIBRARY_SUBDIR   Install-root subdirectory with support libraries (default: files).
  NGINX_DISPATCH_SUPPORT_LIBRARY  Library staged before the module runs (default: utils).
  NGINX_DISPATCH_MODULE           Module to run (default: nginx_config).
  NGINX_DISPATCH_STRATEGY         direct | bootstrap.

Examples:
  nginx-dispatch --target /srv/node1 --args 'listen_port=8080'
  nginx-dispatch --target /srv/node1 --json-args '{"listen_port": 8080}' --check"#
)]
struct Args {
  /// Dispatcher install root; the support library lives under <install-root>/files/utils.
  #[arg(long, value_name = "DIR", default_value = ".")]
  install_root: PathBuf,

  /// Local directory standing in for the managed node.
  #[arg(long, value_name = "DIR")]
  target: PathBuf,

  /// Pre-allocated working directory on the target. Allocated when omitted.
  #[arg(long, value_name = "DIR")]
  work_dir: Option<PathBuf>,

  /// Directory holding module executables. Default: <install-root>/library
  #[arg(long, value_name = "DIR")]
  modules_dir: Option<PathBuf>,

  /// Program used to run the module file (e.g. python3). Runs it directly when omitted.
  #[arg(long, value_name = "PROGRAM")]
  interpreter: Option<PathBuf>,

  /// Flat argument string, e.g. "listen_port=8080". Wins over --json-args when non-empty.
  #[arg(long, value_name = "STRING", default_value = "")]
  args: String,

  /// Structured arguments as a JSON object.
  #[arg(long, value_name = "JSON")]
  json_args: Option<String>,

  /// Dry run: report skipped, touch nothing.
  #[arg(long)]
  check: bool,

  /// direct | bootstrap
  #[arg(long, value_name = "STRATEGY", default_value = "direct")]
  strategy: DispatchStrategy,

  /// Base directory for resolving bootstrap sources.
  #[arg(long, value_name = "DIR")]
  base_dir: Option<PathBuf>,

  /// Environment binding passed to the module (repeatable).
  #[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_env_binding)]
  env: Vec<(String, String)>,

  /// Write dispatch.json with the result into this directory.
  #[arg(long, value_name = "DIR")]
  report_dir: Option<PathBuf>,

  /// Leave an allocated working directory (and the staged library) on the target.
  #[arg(long)]
  keep_work_dir: bool,
}

fn parse_env_binding(s: &str) -> Result<(String, String), String> {
  match s.split_once('=') {
    Some((k, v)) if !k.is_empty() => Ok((k.to_string(), v.to_string())),
    _ => Err(format!("expected KEY=VALUE, got '{s}'")),
  }
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();
  match run(args).await {
    Ok(result) => {
      match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{json}"),
        Err(e) => {
          error!(error = %e, "failed to encode result");
          process::exit(2);
        }
      }
      if !result.success {
        process::exit(1);
      }
    }
    Err(e) => {
      error!(error = %e, "dispatch failed");
      eprintln!("Error: {e}");
      process::exit(2);
    }
  }
}

async fn run(args: Args) -> Result<ExecutionResult, DispatchError> {
  // Env vars override flags.
  let base = DispatcherConfig::new(&args.install_root).with_strategy(args.strategy);
  let config = DispatcherConfig::from_env(base)?;
  let modules_dir = args
    .modules_dir
    .clone()
    .unwrap_or_else(|| config.install_root.join("library"));
  info!(
    install_root = %config.install_root.display(),
    modules_dir = %modules_dir.display(),
    strategy = %config.strategy,
    "options (env or flags)"
  );

  let mut executor = CommandModuleExecutor::new(modules_dir);
  if let Some(interpreter) = &args.interpreter {
    executor = executor.with_interpreter(interpreter);
  }
  let stager = Arc::new(LocalFileStager::new());
  let executor = Arc::new(executor);
  let bootstrapper = Arc::new(StagingBootstrapper::new(
    stager.clone(),
    executor.clone(),
    config.module_name.clone(),
  ));
  let collaborators = Collaborators::direct(stager, executor).with_bootstrapper(bootstrapper);
  let dispatcher = ConfigDispatcher::new(config, collaborators)?;

  let mut module_args = ModuleArgs::raw(args.args.clone());
  if let Some(json) = &args.json_args {
    module_args = module_args.with_structured(ModuleArgs::parse_structured(json)?);
  }
  let mut ctx = DispatchContext::new().check_mode(args.check);
  if let Some(base_dir) = &args.base_dir {
    ctx = ctx.with_base_dir(base_dir);
  }
  for (k, v) in &args.env {
    ctx = ctx.with_var(k, v);
  }

  let conn = LocalConnection::new(&args.target);
  let dispatched = dispatcher
    .dispatch(&conn, args.work_dir.as_deref(), &module_args, &ctx)
    .await;
  if !args.keep_work_dir {
    match conn.remove_work_dirs().await {
      Ok(removed) => debug!(removed, "working directories removed"),
      Err(e) => warn!(error = %e, "failed to remove working directory"),
    }
  }
  let result = dispatched?;
  info!(status = %result.status(), "dispatch completed");

  if let Some(report_dir) = &args.report_dir {
    let report = DispatchReport {
      host: conn.host().to_string(),
      module: dispatcher.config().module_name.clone(),
      strategy: dispatcher.strategy(),
      result: result.clone(),
    };
    let path = report_io::save_report_in(report_dir, &report)?;
    info!(path = %path.display(), "report written");
  }
  Ok(result)
}
