//! Tests for `ConfigurationPayload`.

use proptest::prelude::*;
use serde_json::json;

use super::{ConfigurationPayload, ModuleArgs, StructuredArgs};

fn map(value: serde_json::Value) -> StructuredArgs {
  value.as_object().cloned().unwrap()
}

#[test]
fn raw_string_wins_over_mapping() {
  let args = ModuleArgs::raw("listen_port=8080").with_structured(map(json!({"listen_port": 9090})));
  assert_eq!(
    ConfigurationPayload::resolve(&args),
    ConfigurationPayload::Raw("listen_port=8080".to_string())
  );
}

#[test]
fn mapping_used_when_raw_empty() {
  let args = ModuleArgs::structured(map(json!({"listen_port": 8080})));
  assert_eq!(
    ConfigurationPayload::resolve(&args),
    ConfigurationPayload::Structured(map(json!({"listen_port": 8080})))
  );
}

#[test]
fn empty_mapping_is_still_the_source() {
  let args = ModuleArgs::structured(StructuredArgs::new());
  assert_eq!(
    ConfigurationPayload::resolve(&args),
    ConfigurationPayload::Structured(StructuredArgs::new())
  );
}

#[test]
fn nothing_supplied_is_empty() {
  let payload = ConfigurationPayload::resolve(&ModuleArgs::default());
  assert!(payload.is_empty());
}

#[test]
fn serializes_untagged() {
  let raw = ConfigurationPayload::Raw("a=1".to_string());
  assert_eq!(serde_json::to_value(&raw).unwrap(), json!("a=1"));
  let structured = ConfigurationPayload::Structured(map(json!({"a": 1})));
  assert_eq!(serde_json::to_value(&structured).unwrap(), json!({"a": 1}));
  assert_eq!(
    serde_json::to_value(ConfigurationPayload::Empty).unwrap(),
    serde_json::Value::Null
  );
}

#[test]
fn to_module_args_keeps_only_winner() {
  let args = ModuleArgs::raw("a=1").with_structured(map(json!({"a": 2})));
  let back = ConfigurationPayload::resolve(&args).to_module_args();
  assert_eq!(back, ModuleArgs::raw("a=1"));
}

proptest! {
  #[test]
  fn non_empty_raw_always_wins(raw in "[a-z_]{1,12}=[0-9]{1,5}", port in 1u16..) {
    let args = ModuleArgs::raw(raw.clone()).with_structured(map(json!({"listen_port": port})));
    prop_assert_eq!(ConfigurationPayload::resolve(&args), ConfigurationPayload::Raw(raw));
  }

  #[test]
  fn empty_raw_falls_back_to_mapping(port in 1u16..) {
    let structured = map(json!({"listen_port": port}));
    let args = ModuleArgs::structured(structured.clone());
    prop_assert_eq!(
      ConfigurationPayload::resolve(&args),
      ConfigurationPayload::Structured(structured)
    );
  }
}
