/// Errors that can occur while evaluating a single expression.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
  /// The expression source could not be parsed.
  #[error("failed to compile expression '{expression}': {message}")]
  Compile { expression: String, message: String },

  /// The expression failed at evaluation time.
  #[error("failed to evaluate expression '{expression}': {message}")]
  Evaluate { expression: String, message: String },

  /// The expression evaluated to an undefined value.
  #[error("expression '{expression}' is undefined")]
  Undefined { expression: String },

  /// The result could not be converted into a JSON value.
  #[error("expression '{expression}' produced a non-JSON value: {message}")]
  Conversion { expression: String, message: String },

  /// Evaluation did not finish in time.
  #[error("expression '{expression}' timed out after {timeout_ms}ms")]
  Timeout { expression: String, timeout_ms: u64 },
}
