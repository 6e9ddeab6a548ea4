//! Tests for `report_io`.

use crate::config::DispatchStrategy;
use crate::error::DispatchError;
use crate::report_io::{REPORT_FILENAME, load_report, save_report, save_report_in};
use crate::types::{DispatchReport, ExecutionResult};

fn failed_report() -> DispatchReport {
  DispatchReport {
    host: "web01".to_string(),
    module: "nginx_config".to_string(),
    strategy: DispatchStrategy::DirectStaging,
    result: ExecutionResult::fail("permission denied"),
  }
}

#[test]
fn report_written_into_missing_dir_reads_back() {
  let dir = tempfile::tempdir().unwrap();
  let report_dir = dir.path().join("runs").join("web01");
  let report = failed_report();

  let path = save_report_in(&report_dir, &report).unwrap();

  assert_eq!(path, report_dir.join(REPORT_FILENAME));
  assert_eq!(load_report(&path).unwrap(), report);
}

#[test]
fn saving_over_an_existing_report_replaces_it() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join(REPORT_FILENAME);
  save_report(&path, &failed_report()).unwrap();
  let mut second = failed_report();
  second.result = ExecutionResult::skipped("check mode not supported for this module");

  save_report(&path, &second).unwrap();

  assert!(load_report(&path).unwrap().result.skipped);
}

#[test]
fn missing_report_names_the_path() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("nonexistent.json");
  match load_report(&path) {
    Err(DispatchError::Io { path: reported, .. }) => assert_eq!(reported, path),
    other => panic!("expected Io error, got {other:?}"),
  }
}

#[test]
fn corrupt_report_is_a_json_error() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join(REPORT_FILENAME);
  std::fs::write(&path, "{not json").unwrap();
  assert!(matches!(load_report(&path), Err(DispatchError::Json(_))));
}

#[test]
fn report_dir_that_is_a_file_is_an_io_error() {
  let dir = tempfile::tempdir().unwrap();
  let blocker = dir.path().join("runs");
  std::fs::write(&blocker, "").unwrap();
  let r = save_report_in(&blocker, &failed_report());
  assert!(matches!(r, Err(DispatchError::Io { .. })));
}
