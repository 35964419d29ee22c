//! Expression evaluation backed by minijinja.

use std::sync::Arc;

use async_trait::async_trait;
use minijinja::{Environment, Value};

use crate::error::EvaluationError;
use crate::expression::Expression;
use crate::scope::EvaluationScope;

/// Evaluates bound input expressions against a scope.
#[async_trait]
pub trait ExpressionEvaluator: Send + Sync {
  /// Evaluate an expression and return its value as JSON.
  async fn evaluate(
    &self,
    expression: &Expression,
    scope: &EvaluationScope,
  ) -> Result<serde_json::Value, EvaluationError>;
}

/// Evaluator using minijinja's expression language.
///
/// Literals are returned unchanged. Jinja expressions are compiled and
/// evaluated against [`EvaluationScope::to_context`] on tokio's blocking pool,
/// so callers can time out or cancel a slow expression without stalling the
/// runtime. An expression that evaluates to `undefined` is an error rather
/// than `null`.
#[derive(Clone)]
pub struct MiniJinjaEvaluator {
  env: Arc<Environment<'static>>,
}

impl MiniJinjaEvaluator {
  pub fn new() -> Self {
    Self::with_environment(Environment::new())
  }

  /// Use a preconfigured environment (custom filters, functions, ...).
  pub fn with_environment(env: Environment<'static>) -> Self {
    Self { env: Arc::new(env) }
  }
}

impl Default for MiniJinjaEvaluator {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl ExpressionEvaluator for MiniJinjaEvaluator {
  async fn evaluate(
    &self,
    expression: &Expression,
    scope: &EvaluationScope,
  ) -> Result<serde_json::Value, EvaluationError> {
    let source = match expression {
      Expression::Literal(value) => return Ok(value.clone()),
      Expression::Jinja(source) => source.clone(),
    };

    let env = self.env.clone();
    let context = scope.to_context();
    let task_source = source.clone();
    tokio::task::spawn_blocking(move || evaluate_source(&env, &task_source, context))
      .await
      .map_err(|e| EvaluationError::Evaluate {
        expression: source,
        message: format!("evaluation task failed: {}", e),
      })?
  }
}

fn evaluate_source(
  env: &Environment<'static>,
  source: &str,
  context: serde_json::Value,
) -> Result<serde_json::Value, EvaluationError> {
  let compiled = env
    .compile_expression(source)
    .map_err(|e| EvaluationError::Compile {
      expression: source.to_string(),
      message: e.to_string(),
    })?;

  let value = compiled
    .eval(Value::from_serialize(context))
    .map_err(|e| EvaluationError::Evaluate {
      expression: source.to_string(),
      message: e.to_string(),
    })?;

  if value.is_undefined() {
    return Err(EvaluationError::Undefined {
      expression: source.to_string(),
    });
  }

  serde_json::to_value(&value).map_err(|e| EvaluationError::Conversion {
    expression: source.to_string(),
    message: e.to_string(),
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::time::Duration;

  use serde_json::{Map, json};

  fn scope() -> EvaluationScope {
    let mut properties = Map::new();
    properties.insert(
      "workflow".to_string(),
      json!({ "definition_id": "orders", "version": 3 }),
    );
    EvaluationScope::new(properties)
  }

  #[tokio::test]
  async fn test_literal_passes_through() {
    let evaluator = MiniJinjaEvaluator::new();
    let value = evaluator
      .evaluate(&Expression::literal(json!({ "a": 1 })), &scope())
      .await
      .unwrap();
    assert_eq!(value, json!({ "a": 1 }));
  }

  #[tokio::test]
  async fn test_expression_reads_properties() {
    let evaluator = MiniJinjaEvaluator::new();
    let value = evaluator
      .evaluate(
        &Expression::jinja("'/hooks/' ~ workflow.definition_id"),
        &scope(),
      )
      .await
      .unwrap();
    assert_eq!(value, json!("/hooks/orders"));
  }

  #[tokio::test]
  async fn test_expression_reads_register() {
    let evaluator = MiniJinjaEvaluator::new();
    let mut scope = scope();
    scope.set_input("minutes", json!(5));

    let value = evaluator
      .evaluate(&Expression::jinja("inputs.minutes * 60"), &scope)
      .await
      .unwrap();
    assert_eq!(value, json!(300));
  }

  #[tokio::test]
  async fn test_syntax_error_is_compile_error() {
    let evaluator = MiniJinjaEvaluator::new();
    let err = evaluator
      .evaluate(&Expression::jinja("1 +"), &scope())
      .await
      .unwrap_err();
    assert!(matches!(err, EvaluationError::Compile { .. }));
  }

  #[tokio::test]
  async fn test_undefined_is_error() {
    let evaluator = MiniJinjaEvaluator::new();
    let err = evaluator
      .evaluate(&Expression::jinja("no_such_variable"), &scope())
      .await
      .unwrap_err();
    assert!(matches!(err, EvaluationError::Undefined { .. }));
  }

  #[tokio::test]
  async fn test_slow_expression_can_be_timed_out() {
    let evaluator = MiniJinjaEvaluator::new();
    let expression = Expression::jinja(
      "(range(100000)|map('string')|join|length) + (range(100000)|map('string')|join|length)",
    );

    let result = tokio::time::timeout(
      Duration::from_millis(1),
      evaluator.evaluate(&expression, &scope()),
    )
    .await;
    assert!(result.is_err());
  }
}
