use serde_json::json;
use trellis_expression::{BoundInput, EvaluationScope};

use crate::{Trigger, TriggerError};

/// Starts the workflow on a fixed interval.
#[derive(Debug, Clone)]
pub struct TimerTrigger {
  inputs: Vec<BoundInput>,
}

impl TimerTrigger {
  pub const TYPE_NAME: &'static str = "Timer";
  pub const INTERVAL: &'static str = "interval";

  pub fn new(inputs: Vec<BoundInput>) -> Self {
    Self { inputs }
  }
}

impl Trigger for TimerTrigger {
  fn bound_inputs(&self) -> &[BoundInput] {
    &self.inputs
  }

  fn payloads(&self, scope: &EvaluationScope) -> Result<Vec<serde_json::Value>, TriggerError> {
    let value = scope
      .input(Self::INTERVAL)
      .ok_or_else(|| TriggerError::missing(Self::INTERVAL))?;

    // Accept both 300 and "300"
    let seconds = match value {
      serde_json::Value::Number(n) => n.as_u64(),
      serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
      _ => None,
    }
    .ok_or_else(|| {
      TriggerError::invalid(
        Self::INTERVAL,
        format!("expected a whole number of seconds, got {}", value),
      )
    })?;

    if seconds == 0 {
      return Err(TriggerError::invalid(Self::INTERVAL, "interval must be positive"));
    }

    Ok(vec![json!({ "interval_seconds": seconds })])
  }
}
