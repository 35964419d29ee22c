use std::str::FromStr;

use cron::Schedule;
use serde_json::json;
use trellis_expression::{BoundInput, EvaluationScope};

use super::required_str;
use crate::{Trigger, TriggerError};

/// Starts the workflow on a cron schedule.
#[derive(Debug, Clone)]
pub struct CronTrigger {
  inputs: Vec<BoundInput>,
}

impl CronTrigger {
  pub const TYPE_NAME: &'static str = "Cron";
  pub const CRON_EXPRESSION: &'static str = "cron_expression";

  pub fn new(inputs: Vec<BoundInput>) -> Self {
    Self { inputs }
  }
}

/// Expand 5 and 6 field expressions to the 7 fields `cron::Schedule` parses.
fn normalize(expression: &str) -> String {
  match expression.split_whitespace().count() {
    5 => format!("0 {} *", expression),
    6 => format!("0 {}", expression),
    _ => expression.to_string(),
  }
}

impl Trigger for CronTrigger {
  fn bound_inputs(&self) -> &[BoundInput] {
    &self.inputs
  }

  fn payloads(&self, scope: &EvaluationScope) -> Result<Vec<serde_json::Value>, TriggerError> {
    let cron = required_str(scope, Self::CRON_EXPRESSION)?;
    Schedule::from_str(&normalize(cron)).map_err(|e| {
      TriggerError::invalid(
        Self::CRON_EXPRESSION,
        format!("invalid cron expression '{}': {}", cron, e),
      )
    })?;
    Ok(vec![json!({ "cron": cron })])
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_cron_payload() {
    let mut scope = EvaluationScope::default();
    scope.set_input("cron_expression", json!(" */5 * * * * "));

    let payloads = CronTrigger::new(Vec::new()).payloads(&scope).unwrap();
    assert_eq!(payloads, vec![json!({ "cron": "*/5 * * * *" })]);
  }

  #[test]
  fn test_cron_rejects_short_expression() {
    let mut scope = EvaluationScope::default();
    scope.set_input("cron_expression", json!("* *"));

    let err = CronTrigger::new(Vec::new()).payloads(&scope).unwrap_err();
    assert!(matches!(err, TriggerError::InvalidInput { .. }));
  }

  #[test]
  fn test_cron_rejects_malformed_fields() {
    for expression in ["hello world foo bar baz", "99 99 99 99 99", "*/5 * * * * * * *"] {
      let mut scope = EvaluationScope::default();
      scope.set_input("cron_expression", json!(expression));

      let err = CronTrigger::new(Vec::new()).payloads(&scope).unwrap_err();
      assert!(
        matches!(err, TriggerError::InvalidInput { .. }),
        "accepted '{}'",
        expression
      );
    }
  }

  #[test]
  fn test_cron_accepts_seconds_field() {
    let mut scope = EvaluationScope::default();
    scope.set_input("cron_expression", json!("30 0 12 * * *"));

    let payloads = CronTrigger::new(Vec::new()).payloads(&scope).unwrap();
    assert_eq!(payloads, vec![json!({ "cron": "30 0 12 * * *" })]);
  }

  #[test]
  fn test_cron_requires_expression() {
    let err = CronTrigger::new(Vec::new())
      .payloads(&EvaluationScope::default())
      .unwrap_err();
    assert!(matches!(err, TriggerError::MissingInput { .. }));
  }
}
