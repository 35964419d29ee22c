use std::fmt;

use trellis_expression::{BoundInput, EvaluationScope};

/// Error type for trigger operations.
#[derive(Debug, thiserror::Error)]
pub enum TriggerError {
  #[error("missing required input: {input}")]
  MissingInput { input: String },

  #[error("invalid input '{input}': {message}")]
  InvalidInput { input: String, message: String },

  #[error("invalid trigger configuration: {0}")]
  InvalidConfig(String),
}

impl TriggerError {
  pub fn missing(input: impl Into<String>) -> Self {
    Self::MissingInput {
      input: input.into(),
    }
  }

  pub fn invalid(input: impl Into<String>, message: impl Into<String>) -> Self {
    Self::InvalidInput {
      input: input.into(),
      message: message.into(),
    }
  }
}

/// The capability of an activity that can start a workflow on an external condition.
///
/// The indexer evaluates every [`BoundInput`] into an isolated scope and then
/// calls [`Trigger::payloads`] with it. Payloads are opaque to the indexer; a
/// trigger may return none (disabled or misconfigured) or several.
pub trait Trigger: fmt::Debug + Send + Sync {
  /// Inputs that can be resolved without a running workflow instance.
  fn bound_inputs(&self) -> &[BoundInput];

  /// Build the payload descriptors for this trigger from an evaluated scope.
  fn payloads(&self, scope: &EvaluationScope) -> Result<Vec<serde_json::Value>, TriggerError>;
}
