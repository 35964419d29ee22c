use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::json;
use trellis_expression::{BoundInput, EvaluationScope};

use super::required_str;
use crate::{Trigger, TriggerError};

/// Starts the workflow once, at a fixed point in time.
#[derive(Debug, Clone)]
pub struct StartAtTrigger {
  inputs: Vec<BoundInput>,
}

impl StartAtTrigger {
  pub const TYPE_NAME: &'static str = "StartAt";
  pub const DATE_TIME: &'static str = "date_time";

  pub fn new(inputs: Vec<BoundInput>) -> Self {
    Self { inputs }
  }
}

impl Trigger for StartAtTrigger {
  fn bound_inputs(&self) -> &[BoundInput] {
    &self.inputs
  }

  fn payloads(&self, scope: &EvaluationScope) -> Result<Vec<serde_json::Value>, TriggerError> {
    let raw = required_str(scope, Self::DATE_TIME)?;
    let execute_at = DateTime::parse_from_rfc3339(raw)
      .map_err(|e| TriggerError::invalid(Self::DATE_TIME, e.to_string()))?
      .with_timezone(&Utc);

    Ok(vec![json!({
      "execute_at": execute_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    })])
  }
}
