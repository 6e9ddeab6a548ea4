//! The configuration that actually counts for one dispatch.

use serde::{Deserialize, Serialize};

use super::{ModuleArgs, StructuredArgs};

/// Effective configuration for the remote module.
///
/// A non-empty flat argument string always wins; the structured mapping is used only when
/// the string is empty. The two are never merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigurationPayload {
  Raw(String),
  Structured(StructuredArgs),
  #[default]
  Empty,
}

impl ConfigurationPayload {
  pub fn resolve(args: &ModuleArgs) -> Self {
    if !args.raw.is_empty() {
      ConfigurationPayload::Raw(args.raw.clone())
    } else if let Some(map) = &args.structured {
      ConfigurationPayload::Structured(map.clone())
    } else {
      ConfigurationPayload::Empty
    }
  }

  pub fn is_empty(&self) -> bool {
    matches!(self, ConfigurationPayload::Empty)
  }

  /// Turns the payload back into module arguments carrying only the winning source.
  pub fn to_module_args(&self) -> ModuleArgs {
    match self {
      ConfigurationPayload::Raw(raw) => ModuleArgs::raw(raw.clone()),
      ConfigurationPayload::Structured(map) => ModuleArgs::structured(map.clone()),
      ConfigurationPayload::Empty => ModuleArgs::default(),
    }
  }
}
