//! Isolated evaluation scopes.
//!
//! Each trigger activity gets its own [`EvaluationScope`] while its inputs are
//! being resolved. The scope owns a [`Register`] that receives evaluated input
//! values; nothing in it is shared with any other activity.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Variable storage for one trigger activity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Register {
  slots: BTreeMap<String, Value>,
}

impl Register {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn set(&mut self, target: impl Into<String>, value: Value) {
    self.slots.insert(target.into(), value);
  }

  pub fn get(&self, target: &str) -> Option<&Value> {
    self.slots.get(target)
  }

  pub fn contains(&self, target: &str) -> bool {
    self.slots.contains_key(target)
  }

  pub fn len(&self) -> usize {
    self.slots.len()
  }

  pub fn is_empty(&self) -> bool {
    self.slots.is_empty()
  }

  fn to_value(&self) -> Value {
    Value::Object(
      self
        .slots
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect(),
    )
  }
}

/// Expression scope: a read-only property bag plus the activity's register.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationScope {
  properties: Map<String, Value>,
  register: Register,
}

impl EvaluationScope {
  /// Create a scope seeded with the given property bag and an empty register.
  pub fn new(properties: Map<String, Value>) -> Self {
    Self {
      properties,
      register: Register::new(),
    }
  }

  pub fn properties(&self) -> &Map<String, Value> {
    &self.properties
  }

  pub fn register(&self) -> &Register {
    &self.register
  }

  /// Write an evaluated input into the register.
  pub fn set_input(&mut self, target: impl Into<String>, value: Value) {
    self.register.set(target, value);
  }

  /// Read an evaluated input from the register.
  pub fn input(&self, target: &str) -> Option<&Value> {
    self.register.get(target)
  }

  /// Read an evaluated input as a string, ignoring empty strings.
  pub fn input_str(&self, target: &str) -> Option<&str> {
    self
      .input(target)
      .and_then(|v| v.as_str())
      .filter(|s| !s.trim().is_empty())
  }

  /// Build the context object expressions are evaluated against.
  pub fn to_context(&self) -> Value {
    let mut context = self.properties.clone();
    context.insert("inputs".to_string(), self.register.to_value());
    Value::Object(context)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_context_exposes_properties_and_inputs() {
    let mut properties = Map::new();
    properties.insert("workflow".to_string(), json!({ "definition_id": "wf-1" }));

    let mut scope = EvaluationScope::new(properties);
    scope.set_input("path", json!("/hooks/wf-1"));

    assert_eq!(
      scope.to_context(),
      json!({
        "workflow": { "definition_id": "wf-1" },
        "inputs": { "path": "/hooks/wf-1" }
      })
    );
  }

  #[test]
  fn test_input_str_skips_blank_values() {
    let mut scope = EvaluationScope::default();
    scope.set_input("blank", json!("  "));
    scope.set_input("number", json!(5));
    scope.set_input("name", json!("orders"));

    assert_eq!(scope.input_str("blank"), None);
    assert_eq!(scope.input_str("number"), None);
    assert_eq!(scope.input_str("name"), Some("orders"));
    assert_eq!(scope.input_str("missing"), None);
  }

  #[test]
  fn test_scopes_do_not_share_registers() {
    let base = EvaluationScope::default();
    let mut a = base.clone();
    let b = base.clone();

    a.set_input("x", json!(1));

    assert!(a.register().contains("x"));
    assert!(b.register().is_empty());
  }
}
