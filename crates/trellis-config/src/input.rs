//! Input definitions for activity configuration.
//!
//! An input is either a literal JSON value or a minijinja expression that is
//! evaluated against the indexing scope when triggers are indexed.
//!
//! # Examples
//!
//! ```json
//! {
//!   "cron_expression": "*/5 * * * *",
//!   "path": { "expression": "'/hooks/' ~ workflow.definition_id" },
//!   "methods": ["POST", "PUT"]
//! }
//! ```

use serde::{Deserialize, Serialize};

/// A single activity input as written in a workflow definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputDef {
  /// An expression evaluated by the expression engine.
  Expression { expression: String },
  /// Any other JSON value is taken literally.
  Literal(serde_json::Value),
}

impl InputDef {
  pub fn literal(value: impl Into<serde_json::Value>) -> Self {
    Self::Literal(value.into())
  }

  pub fn expression(source: impl Into<String>) -> Self {
    Self::Expression {
      expression: source.into(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_expression_input() {
    let input: InputDef = serde_json::from_value(json!({ "expression": "workflow.name" })).unwrap();
    assert_eq!(input, InputDef::expression("workflow.name"));
  }

  #[test]
  fn test_literal_input() {
    let input: InputDef = serde_json::from_value(json!("*/5 * * * *")).unwrap();
    assert_eq!(input, InputDef::literal("*/5 * * * *"));

    let input: InputDef = serde_json::from_value(json!(["GET", "POST"])).unwrap();
    assert_eq!(input, InputDef::literal(json!(["GET", "POST"])));
  }

  #[test]
  fn test_object_without_expression_key_is_literal() {
    let input: InputDef = serde_json::from_value(json!({ "value": 3 })).unwrap();
    assert_eq!(input, InputDef::literal(json!({ "value": 3 })));
  }
}
