//! Dispatch records on disk: one pretty-printed [DispatchReport] per run, so a run against a
//! host can be inspected after the CLI has exited.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::error::DispatchError;
use crate::types::DispatchReport;

/// File name used by [save_report_in].
pub const REPORT_FILENAME: &str = "dispatch.json";

/// Writes `report` to `<report_dir>/dispatch.json` and returns that path.
pub fn save_report_in(
  report_dir: &Path,
  report: &DispatchReport,
) -> Result<PathBuf, DispatchError> {
  let path = report_dir.join(REPORT_FILENAME);
  save_report(&path, report)?;
  Ok(path)
}

#[instrument(level = "trace", skip(report), fields(path = %path.display(), host = %report.host))]
pub fn save_report(path: &Path, report: &DispatchReport) -> Result<(), DispatchError> {
  let json = serde_json::to_vec_pretty(report)?;
  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    fs::create_dir_all(parent).map_err(|e| DispatchError::io(parent, e))?;
  }
  fs::write(path, json).map_err(|e| DispatchError::io(path, e))?;
  debug!(status = %report.result.status(), "dispatch report written");
  Ok(())
}

/// Reads a report back. A missing file is [DispatchError::Io], bad contents [DispatchError::Json].
pub fn load_report(path: &Path) -> Result<DispatchReport, DispatchError> {
  let bytes = fs::read(path).map_err(|e| DispatchError::io(path, e))?;
  Ok(serde_json::from_slice(&bytes)?)
}
