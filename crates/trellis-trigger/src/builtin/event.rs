use serde_json::json;
use trellis_expression::{BoundInput, EvaluationScope};

use super::required_str;
use crate::{Trigger, TriggerError};

/// Starts the workflow when a named event or signal is published.
#[derive(Debug, Clone)]
pub struct EventTrigger {
  inputs: Vec<BoundInput>,
}

impl EventTrigger {
  pub const TYPE_NAME: &'static str = "Event";
  pub const EVENT_NAME: &'static str = "event_name";

  pub fn new(inputs: Vec<BoundInput>) -> Self {
    Self { inputs }
  }
}

impl Trigger for EventTrigger {
  fn bound_inputs(&self) -> &[BoundInput] {
    &self.inputs
  }

  fn payloads(&self, scope: &EvaluationScope) -> Result<Vec<serde_json::Value>, TriggerError> {
    let event_name = required_str(scope, Self::EVENT_NAME)?;
    Ok(vec![json!({ "event_name": event_name })])
  }
}
