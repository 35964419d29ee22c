//! Per-run indexing state.

use std::collections::HashMap;

use serde_json::{Map, Value, json};
use tokio_util::sync::CancellationToken;
use trellis_expression::EvaluationScope;
use trellis_workflow::{Activity, Workflow};

/// A trigger activity's isolated scope and whether its inputs were evaluated.
#[derive(Debug)]
pub(crate) struct RegisterEntry {
  pub scope: EvaluationScope,
  pub evaluated: bool,
}

/// State for a single indexing run.
///
/// Holds one register per trigger activity, created on first access and
/// reused for the rest of the run. Registers are never shared between
/// activities and are dropped with the context.
pub struct IndexingContext<'a> {
  workflow: &'a Workflow,
  cancel: CancellationToken,
  registers: HashMap<String, RegisterEntry>,
}

impl<'a> IndexingContext<'a> {
  pub fn new(workflow: &'a Workflow, cancel: CancellationToken) -> Self {
    Self {
      workflow,
      cancel,
      registers: HashMap::new(),
    }
  }

  pub fn workflow(&self) -> &Workflow {
    self.workflow
  }

  pub fn cancellation_token(&self) -> &CancellationToken {
    &self.cancel
  }

  pub fn is_cancelled(&self) -> bool {
    self.cancel.is_cancelled()
  }

  /// Number of registers created so far in this run.
  pub fn register_count(&self) -> usize {
    self.registers.len()
  }

  /// Get the register for an activity, creating it on first access.
  pub(crate) fn register_for(&mut self, activity: &Activity) -> &mut RegisterEntry {
    let workflow = self.workflow;
    self
      .registers
      .entry(activity.activity_id.clone())
      .or_insert_with(|| RegisterEntry {
        scope: EvaluationScope::new(indexing_properties(workflow, activity)),
        evaluated: false,
      })
  }
}

/// The property bag visible to bound input expressions during indexing.
///
/// ```json
/// {
///   "workflow": { "definition_id": "...", "version": 1, "name": "..." },
///   "activity": { "id": "...", "type": "..." }
/// }
/// ```
pub(crate) fn indexing_properties(workflow: &Workflow, activity: &Activity) -> Map<String, Value> {
  let mut properties = Map::new();
  properties.insert(
    "workflow".to_string(),
    json!({
      "definition_id": workflow.identity.definition_id,
      "version": workflow.identity.version,
      "name": workflow.name,
    }),
  );
  properties.insert(
    "activity".to_string(),
    json!({
      "id": activity.activity_id,
      "type": activity.type_name,
    }),
  );
  properties
}
