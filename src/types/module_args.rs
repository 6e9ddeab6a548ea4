//! Arguments as the caller handed them over, and the module invocation built from them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Structured key-value arguments.
pub type StructuredArgs = Map<String, Value>;

/// The original, unmodified arguments of one dispatch.
///
/// Either source may be present; [ConfigurationPayload](super::ConfigurationPayload) decides which
/// one counts. The remote module always receives both exactly as given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleArgs {
  /// Flat `key=value ...` argument string. Empty means absent.
  #[serde(default)]
  pub raw: String,
  /// Structured argument mapping.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub structured: Option<StructuredArgs>,
}

impl ModuleArgs {
  pub fn raw(raw: impl Into<String>) -> Self {
    Self {
      raw: raw.into(),
      structured: None,
    }
  }

  pub fn structured(structured: StructuredArgs) -> Self {
    Self {
      raw: String::new(),
      structured: Some(structured),
    }
  }

  pub fn with_structured(mut self, structured: StructuredArgs) -> Self {
    self.structured = Some(structured);
    self
  }

  /// Parses a JSON object into structured arguments.
  pub fn parse_structured(json: &str) -> Result<StructuredArgs, serde_json::Error> {
    serde_json::from_str(json)
  }
}

/// One request to run a remote module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleInvocation {
  pub module_name: String,
  pub raw_args: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub structured_args: Option<StructuredArgs>,
}

impl ModuleInvocation {
  pub fn new(module_name: impl Into<String>, args: &ModuleArgs) -> Self {
    Self {
      module_name: module_name.into(),
      raw_args: args.raw.clone(),
      structured_args: args.structured.clone(),
    }
  }
}
