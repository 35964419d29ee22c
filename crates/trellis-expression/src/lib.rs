//! Trellis Expression
//!
//! Expression evaluation for statically bound activity inputs.
//!
//! # Architecture
//!
//! ```text
//! Expression          literal JSON value or minijinja expression source
//! EvaluationScope     property bag + register (isolated per trigger activity)
//! ExpressionEvaluator evaluate(expression, scope) -> serde_json::Value
//! ```
//!
//! Inside an expression the property bag is available at the top level
//! (`workflow.definition_id`, `activity.id`, ...) and values already written to
//! the register are available under `inputs` (`inputs.path`).

mod error;
mod evaluator;
mod expression;
mod scope;

pub use error::EvaluationError;
pub use evaluator::{ExpressionEvaluator, MiniJinjaEvaluator};
pub use expression::{BoundInput, Expression};
pub use scope::{EvaluationScope, Register};
