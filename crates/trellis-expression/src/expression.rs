use std::fmt;

use serde::{Deserialize, Serialize};

/// A statically bound input expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Expression {
  /// A value known at definition time.
  Literal(serde_json::Value),
  /// A minijinja expression, e.g. `"'/hooks/' ~ workflow.definition_id"`.
  Jinja(String),
}

impl Expression {
  pub fn literal(value: impl Into<serde_json::Value>) -> Self {
    Self::Literal(value.into())
  }

  pub fn jinja(source: impl Into<String>) -> Self {
    Self::Jinja(source.into())
  }
}

impl fmt::Display for Expression {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Literal(value) => write!(f, "{}", value),
      Self::Jinja(source) => f.write_str(source),
    }
  }
}

/// An input whose expression is evaluated and written into a register slot.
///
/// `target` names the slot in the trigger's register that receives the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundInput {
  pub target: String,
  pub expression: Expression,
}

impl BoundInput {
  pub fn new(target: impl Into<String>, expression: Expression) -> Self {
    Self {
      target: target.into(),
      expression,
    }
  }
}
