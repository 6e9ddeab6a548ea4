//! Tests for `CommandModuleExecutor`.

use std::fs;
use std::path::Path;

use serde_json::json;

use super::command_executor::interpret_output;
use crate::collaborators::ModuleExecutor;
use crate::error::DispatchError;
use crate::local::{CommandModuleExecutor, LocalConnection};
use crate::types::{DispatchContext, ModuleArgs, ModuleInvocation};

/// Echoes stdin and selected environment back as the result.
const ECHO_MODULE: &str = r#"read -r payload
site="\"site\": \"$NGINX_SITE\""
work_dir="\"work_dir\": \"$NGINX_DISPATCH_WORK_DIR\""
echo "{\"changed\": true, \"input\": $payload, $site, $work_dir, \"cwd\": \"$(pwd)\"}"
"#;

/// Answers without reading stdin.
const DEAF_MODULE: &str = r#"echo '{"changed": false}'
"#;

const FAILING_MODULE: &str = r#"read -r payload
echo '{"failed": true, "msg": "nginx -t failed"}'
"#;

fn write_module(dir: &Path, name: &str, body: &str) {
  fs::write(dir.join(name), body).unwrap();
}

fn invocation(module: &str) -> ModuleInvocation {
  let args = ModuleArgs::raw("listen_port=8080")
    .with_structured(json!({"listen_port": 9090}).as_object().cloned().unwrap());
  ModuleInvocation::new(module, &args)
}

#[tokio::test]
async fn runs_module_with_invocation_on_stdin() {
  let modules = tempfile::tempdir().unwrap();
  let work = tempfile::tempdir().unwrap();
  write_module(modules.path(), "nginx_config", ECHO_MODULE);
  let executor = CommandModuleExecutor::new(modules.path()).with_interpreter("sh");
  let conn = LocalConnection::new(work.path());
  let ctx = DispatchContext::new().with_var("NGINX_SITE", "default");

  let r = executor
    .execute(&conn, work.path(), &invocation("nginx_config"), &ctx)
    .await
    .unwrap();

  assert!(r.success, "{r:?}");
  assert!(r.changed);
  assert_eq!(r.payload["input"]["module_name"], "nginx_config");
  assert_eq!(r.payload["input"]["raw_args"], "listen_port=8080");
  assert_eq!(r.payload["input"]["structured_args"], json!({"listen_port": 9090}));
  assert_eq!(r.payload["input"]["check_mode"], false);
  assert_eq!(r.payload["site"], "default");
  let reported = r.payload["work_dir"].as_str().unwrap();
  assert_eq!(Path::new(reported), work.path());
}

#[tokio::test]
async fn failed_flag_marks_failure() {
  let modules = tempfile::tempdir().unwrap();
  let work = tempfile::tempdir().unwrap();
  write_module(modules.path(), "nginx_config", FAILING_MODULE);
  let executor = CommandModuleExecutor::new(modules.path()).with_interpreter("sh");
  let conn = LocalConnection::new(work.path());

  let r = executor
    .execute(&conn, work.path(), &invocation("nginx_config"), &DispatchContext::new())
    .await
    .unwrap();
  assert!(!r.success);
  assert_eq!(r.error.as_deref(), Some("nginx -t failed"));
}

#[tokio::test]
async fn module_that_ignores_stdin_still_succeeds() {
  let modules = tempfile::tempdir().unwrap();
  let work = tempfile::tempdir().unwrap();
  write_module(modules.path(), "nginx_config", DEAF_MODULE);
  let executor = CommandModuleExecutor::new(modules.path()).with_interpreter("sh");
  let conn = LocalConnection::new(work.path());
  // Larger than a pipe buffer, so the writer outlives the module.
  let args = ModuleArgs::raw("x".repeat(300 * 1024));

  let r = executor
    .execute(
      &conn,
      work.path(),
      &ModuleInvocation::new("nginx_config", &args),
      &DispatchContext::new(),
    )
    .await
    .unwrap();

  assert!(r.success, "{r:?}");
  assert!(!r.changed);
}

#[tokio::test]
async fn missing_interpreter_is_a_spawn_error() {
  let modules = tempfile::tempdir().unwrap();
  let work = tempfile::tempdir().unwrap();
  let executor =
    CommandModuleExecutor::new(modules.path()).with_interpreter("/nonexistent/interpreter");
  let conn = LocalConnection::new(work.path());

  let r = executor
    .execute(&conn, work.path(), &invocation("nginx_config"), &DispatchContext::new())
    .await;
  assert!(matches!(r, Err(DispatchError::Spawn { .. })));
}

#[test]
fn non_zero_exit_without_json_is_failure() {
  let r = interpret_output("nginx_config", false, Some(3), b"oops", b"traceback").unwrap();
  assert!(!r.success);
  assert_eq!(
    r.error.as_deref(),
    Some("module nginx_config exited with status 3")
  );
  assert_eq!(r.payload["stderr"], "traceback");
}

#[test]
fn non_zero_exit_with_json_keeps_payload() {
  let r = interpret_output("m", false, Some(1), br#"{"changed": true}"#, b"").unwrap();
  assert!(!r.success);
  assert!(r.changed);
  assert_eq!(r.error.as_deref(), Some("module m exited with status 1"));
}

#[test]
fn clean_exit_with_garbage_is_an_error() {
  let r = interpret_output("m", true, Some(0), b"not json", b"");
  assert!(matches!(r, Err(DispatchError::ModuleOutput { .. })));
}

#[test]
fn clean_exit_with_json_is_success() {
  let stdout = br#"{"changed": false, "port": 8080}"#;
  let r = interpret_output("m", true, Some(0), stdout, b"").unwrap();
  assert!(r.success);
  assert!(!r.changed);
  assert_eq!(r.payload["port"], 8080);
}

#[test]
fn signal_termination_is_reported() {
  let r = interpret_output("m", false, None, b"", b"").unwrap();
  assert_eq!(r.error.as_deref(), Some("module m terminated by signal"));
}
