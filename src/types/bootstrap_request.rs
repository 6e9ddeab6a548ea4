//! Hand-off to a dependency bootstrapper.

use serde::{Deserialize, Serialize};

use super::{ConfigurationPayload, SourceSpec};

/// Everything a bootstrapper needs to stage sources and then run the module itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapRequest {
  /// Sources with absolute paths, staged in order.
  pub sources: Vec<SourceSpec>,
  /// Tells the bootstrapper to run the module directly instead of re-entering a dispatcher.
  #[serde(rename = "skip_action_plugin")]
  pub skip_indirection: bool,
  #[serde(rename = "nginx_config")]
  pub payload: ConfigurationPayload,
}
