//! A support-library artifact that must exist on the target before the module runs.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A support-library artifact required on the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
  /// Path of the artifact, relative to `<base>/<library_subdir>` unless absolute.
  #[serde(rename = "src")]
  pub local_path: PathBuf,
  /// Base directory overriding the caller's and the install root.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub origin_base_dir: Option<PathBuf>,
}

impl SourceSpec {
  pub fn new(local_path: impl Into<PathBuf>) -> Self {
    Self {
      local_path: local_path.into(),
      origin_base_dir: None,
    }
  }

  pub fn with_origin(mut self, base: impl Into<PathBuf>) -> Self {
    self.origin_base_dir = Some(base.into());
    self
  }

  /// Resolves the artifact's absolute location.
  ///
  /// Base directory precedence: this spec's `origin_base_dir`, then `caller_base`, then
  /// `install_root`. Absolute `local_path`s are returned unchanged.
  pub fn resolve(
    &self,
    install_root: &Path,
    caller_base: Option<&Path>,
    library_subdir: &str,
  ) -> PathBuf {
    if self.local_path.is_absolute() {
      return self.local_path.clone();
    }
    let base = self
      .origin_base_dir
      .as_deref()
      .or(caller_base)
      .unwrap_or(install_root);
    base.join(library_subdir).join(&self.local_path)
  }

  /// Copy of this spec with its path resolved and the origin consumed.
  pub fn resolved(
    &self,
    install_root: &Path,
    caller_base: Option<&Path>,
    library_subdir: &str,
  ) -> Self {
    Self {
      local_path: self.resolve(install_root, caller_base, library_subdir),
      origin_base_dir: None,
    }
  }
}
