//! Copies files and directory trees into a working directory on a local target.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::collaborators::{Connection, FileStager};
use crate::error::DispatchError;
use crate::types::{StagingRequest, StagingResult};

/// [FileStager] that copies on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileStager;

impl LocalFileStager {
  pub fn new() -> Self {
    Self
  }
}

#[async_trait]
impl FileStager for LocalFileStager {
  #[instrument(
    level = "trace",
    skip_all,
    fields(host = conn.host(), src = %request.local_path.display())
  )]
  async fn stage(
    &self,
    conn: &dyn Connection,
    request: &StagingRequest,
  ) -> Result<StagingResult, DispatchError> {
    let src = request.local_path.clone();
    let dest = request.destination();
    let follow_links = request.follow_links;
    let outcome = tokio::task::spawn_blocking({
      let dest = dest.clone();
      move || copy_path(&src, &dest, follow_links)
    })
    .await
    .map_err(|e| DispatchError::Join(e.to_string()))?;

    Ok(match outcome {
      Ok(changed) => {
        debug!(host = conn.host(), dest = %dest.display(), changed, "staged");
        StagingResult::staged(dest, changed)
      }
      Err(e) => StagingResult::fail(format!(
        "failed to stage {} to {}: {e}",
        request.local_path.display(),
        dest.display()
      )),
    })
  }
}

/// Copies `src` (file or directory) to `dest`. Returns whether anything on disk changed.
pub(crate) fn copy_path(src: &Path, dest: &Path, follow_links: bool) -> io::Result<bool> {
  let meta = metadata(src, follow_links)?;
  if meta.is_dir() {
    copy_dir(src, dest, follow_links, &mut HashSet::new())
  } else if meta.file_type().is_symlink() {
    copy_link(src, dest)
  } else {
    copy_file(src, dest)
  }
}

fn metadata(path: &Path, follow_links: bool) -> io::Result<fs::Metadata> {
  if follow_links {
    fs::metadata(path)
  } else {
    fs::symlink_metadata(path)
  }
}

fn copy_dir(
  src: &Path,
  dest: &Path,
  follow_links: bool,
  ancestors: &mut HashSet<PathBuf>,
) -> io::Result<bool> {
  // A followed link back into the directory being copied is a cycle. Reaching the same
  // directory again through a sibling link is not.
  let canonical = fs::canonicalize(src)?;
  if !ancestors.insert(canonical.clone()) {
    return Ok(false);
  }
  let mut changed = false;
  if !dest.is_dir() {
    fs::create_dir_all(dest)?;
    changed = true;
  }
  let mut entries = fs::read_dir(src)?.collect::<Result<Vec<_>, _>>()?;
  entries.sort_by_key(|e| e.file_name());
  for entry in entries {
    let from = entry.path();
    let to = dest.join(entry.file_name());
    let meta = metadata(&from, follow_links)?;
    changed |= if meta.is_dir() {
      copy_dir(&from, &to, follow_links, ancestors)?
    } else if meta.file_type().is_symlink() {
      copy_link(&from, &to)?
    } else {
      copy_file(&from, &to)?
    };
  }
  ancestors.remove(&canonical);
  Ok(changed)
}

fn copy_file(src: &Path, dest: &Path) -> io::Result<bool> {
  let content = fs::read(src)?;
  if fs::read(dest).is_ok_and(|existing| existing == content) {
    return Ok(false);
  }
  if let Some(parent) = dest.parent() {
    fs::create_dir_all(parent)?;
  }
  fs::write(dest, &content)?;
  fs::set_permissions(dest, fs::metadata(src)?.permissions())?;
  Ok(true)
}

#[cfg(unix)]
fn copy_link(src: &Path, dest: &Path) -> io::Result<bool> {
  let target = fs::read_link(src)?;
  if fs::read_link(dest).is_ok_and(|existing| existing == target) {
    return Ok(false);
  }
  if fs::symlink_metadata(dest).is_ok() {
    fs::remove_file(dest)?;
  }
  std::os::unix::fs::symlink(&target, dest)?;
  Ok(true)
}

#[cfg(not(unix))]
fn copy_link(src: &Path, dest: &Path) -> io::Result<bool> {
  copy_file(src, dest)
}
