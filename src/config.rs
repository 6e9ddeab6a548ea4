//! Dispatcher configuration: install root, conventional names, strategy.
//!
//! Defaults match the conventional layout (`<install_root>/files/utils`, module `nginx_config`).
//! [DispatcherConfig::from_lookup] applies `NGINX_DISPATCH_*` overrides on top of a base config.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DispatchError;
use crate::types::SourceSpec;

pub const DEFAULT_LIBRARY_SUBDIR: &str = "files";
pub const DEFAULT_SUPPORT_LIBRARY: &str = "utils";
pub const DEFAULT_MODULE_NAME: &str = "nginx_config";

pub const ENV_INSTALL_ROOT: &str = "NGINX_DISPATCH_INSTALL_ROOT";
pub const ENV_LIBRARY_SUBDIR: &str = "NGINX_DISPATCH_LIBRARY_SUBDIR";
pub const ENV_SUPPORT_LIBRARY: &str = "NGINX_DISPATCH_SUPPORT_LIBRARY";
pub const ENV_MODULE: &str = "NGINX_DISPATCH_MODULE";
pub const ENV_STRATEGY: &str = "NGINX_DISPATCH_STRATEGY";

/// How dependencies reach the target before the module runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchStrategy {
  /// Copy the support library, then run the module.
  #[default]
  DirectStaging,
  /// Hand sources and payload to a bootstrapper and return whatever it returns.
  Bootstrap,
}

impl fmt::Display for DispatchStrategy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      DispatchStrategy::DirectStaging => write!(f, "direct"),
      DispatchStrategy::Bootstrap => write!(f, "bootstrap"),
    }
  }
}

impl FromStr for DispatchStrategy {
  type Err = DispatchError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "direct" | "direct_staging" | "stage" => Ok(DispatchStrategy::DirectStaging),
      "bootstrap" => Ok(DispatchStrategy::Bootstrap),
      other => Err(DispatchError::Config(format!("unknown strategy '{other}'"))),
    }
  }
}

/// Static settings of a dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatcherConfig {
  /// Where this dispatcher is installed; relative sources resolve beneath it.
  pub install_root: PathBuf,
  /// Conventional subdirectory holding support libraries.
  pub library_subdir: String,
  /// Directory staged by the direct strategy.
  pub support_library: String,
  /// Remote module to run.
  pub module_name: String,
  pub strategy: DispatchStrategy,
  /// Sources declared for the bootstrap strategy.
  pub sources: Vec<SourceSpec>,
}

impl Default for DispatcherConfig {
  fn default() -> Self {
    Self::new(".")
  }
}

impl DispatcherConfig {
  pub fn new(install_root: impl Into<PathBuf>) -> Self {
    Self {
      install_root: install_root.into(),
      library_subdir: DEFAULT_LIBRARY_SUBDIR.to_string(),
      support_library: DEFAULT_SUPPORT_LIBRARY.to_string(),
      module_name: DEFAULT_MODULE_NAME.to_string(),
      strategy: DispatchStrategy::default(),
      sources: vec![SourceSpec::new(DEFAULT_SUPPORT_LIBRARY)],
    }
  }

  pub fn with_strategy(mut self, strategy: DispatchStrategy) -> Self {
    self.strategy = strategy;
    self
  }

  pub fn with_module_name(mut self, name: impl Into<String>) -> Self {
    self.module_name = name.into();
    self
  }

  pub fn with_library_subdir(mut self, subdir: impl Into<String>) -> Self {
    self.library_subdir = subdir.into();
    self
  }

  pub fn with_support_library(mut self, name: impl Into<String>) -> Self {
    self.support_library = name.into();
    self
  }

  pub fn with_sources(mut self, sources: Vec<SourceSpec>) -> Self {
    self.sources = sources;
    self
  }

  /// Absolute location of the support library staged by the direct strategy.
  pub fn support_library_path(&self) -> PathBuf {
    self
      .install_root
      .join(&self.library_subdir)
      .join(&self.support_library)
  }

  /// Declared sources resolved against `caller_base` (or the install root).
  pub fn resolved_sources(&self, caller_base: Option<&Path>) -> Vec<SourceSpec> {
    self
      .sources
      .iter()
      .map(|s| s.resolved(&self.install_root, caller_base, &self.library_subdir))
      .collect()
  }

  /// Applies `NGINX_DISPATCH_*` overrides from the process environment.
  pub fn from_env(base: Self) -> Result<Self, DispatchError> {
    Self::from_lookup(base, |key| std::env::var(key).ok())
  }

  /// Applies overrides from `lookup`; empty values are ignored.
  pub fn from_lookup<F>(mut base: Self, lookup: F) -> Result<Self, DispatchError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    if let Some(root) = get(ENV_INSTALL_ROOT) {
      base.install_root = PathBuf::from(root);
    }
    if let Some(subdir) = get(ENV_LIBRARY_SUBDIR) {
      base.library_subdir = subdir;
    }
    if let Some(lib) = get(ENV_SUPPORT_LIBRARY) {
      base.support_library = lib;
    }
    if let Some(module) = get(ENV_MODULE) {
      base.module_name = module;
    }
    if let Some(strategy) = get(ENV_STRATEGY) {
      base.strategy = strategy.parse()?;
    }
    base.validate()?;
    Ok(base)
  }

  /// Rejects names that would escape the library directory.
  pub fn validate(&self) -> Result<(), DispatchError> {
    for (field, value) in [
      ("library_subdir", &self.library_subdir),
      ("support_library", &self.support_library),
      ("module_name", &self.module_name),
    ] {
      if value.is_empty() {
        return Err(DispatchError::Config(format!("{field} must not be empty")));
      }
      if value == ".." || value.contains('/') || value.contains('\\') {
        return Err(DispatchError::Config(format!(
          "{field} must be a single path component, got '{value}'"
        )));
      }
    }
    Ok(())
  }
}
