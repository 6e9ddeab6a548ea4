//! A "target" that is a directory on this host.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::collaborators::Connection;
use crate::error::DispatchError;

/// Prefix of working directories created under the target root.
pub const WORK_DIR_PREFIX: &str = ".nginx-dispatch-tmp-";

/// Connection to a local directory standing in for a managed node.
///
/// Working directories it allocates stay on disk (with whatever was staged into them) until
/// [LocalConnection::remove_work_dirs] is called. Clones share the record of allocations.
#[derive(Debug, Clone)]
pub struct LocalConnection {
  host: String,
  root: PathBuf,
  allocated: Arc<Mutex<Vec<PathBuf>>>,
}

impl LocalConnection {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self {
      host: "localhost".to_string(),
      root: root.into(),
      allocated: Arc::default(),
    }
  }

  pub fn with_host(mut self, host: impl Into<String>) -> Self {
    self.host = host.into();
    self
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Directories allocated by [Connection::make_work_dir] and not yet removed.
  pub fn allocated_work_dirs(&self) -> Vec<PathBuf> {
    self.allocated_guard().clone()
  }

  /// Deletes every working directory this connection allocated. Directories supplied by the
  /// caller are never touched. Returns how many were removed.
  #[instrument(level = "trace", skip(self), fields(host = %self.host))]
  pub async fn remove_work_dirs(&self) -> Result<usize, DispatchError> {
    let dirs = std::mem::take(&mut *self.allocated_guard());
    let mut removed = 0;
    for dir in dirs {
      match tokio::fs::remove_dir_all(&dir).await {
        Ok(()) => {
          debug!(host = %self.host, work_dir = %dir.display(), "removed working directory");
          removed += 1;
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(DispatchError::io(dir, e)),
      }
    }
    Ok(removed)
  }

  fn allocated_guard(&self) -> std::sync::MutexGuard<'_, Vec<PathBuf>> {
    // The list stays consistent even if a holder panicked.
    self
      .allocated
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner())
  }
}

#[async_trait]
impl Connection for LocalConnection {
  fn host(&self) -> &str {
    &self.host
  }

  #[instrument(level = "trace", skip(self), fields(host = %self.host))]
  async fn make_work_dir(&self) -> Result<PathBuf, DispatchError> {
    let dir = self
      .root
      .join(format!("{WORK_DIR_PREFIX}{}", uuid::Uuid::new_v4().simple()));
    tokio::fs::create_dir_all(&dir)
      .await
      .map_err(|e| DispatchError::WorkDir {
        host: self.host.clone(),
        reason: format!("{}: {e}", dir.display()),
      })?;
    self.allocated_guard().push(dir.clone());
    Ok(dir)
  }
}
