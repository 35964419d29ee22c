use trellis_trigger::StoredTrigger;
use trellis_workflow::Workflow;

/// Outcome of one indexing run.
#[derive(Debug, Clone)]
pub struct IndexedWorkflow {
  pub workflow: Workflow,
  /// Triggers inserted by this run.
  pub added: Vec<StoredTrigger>,
  /// Triggers deleted by this run.
  pub removed: Vec<StoredTrigger>,
  /// Triggers left in place, with their original ids.
  pub unchanged: Vec<StoredTrigger>,
}

impl IndexedWorkflow {
  pub fn definition_id(&self) -> &str {
    self.workflow.definition_id()
  }

  /// True when the run changed the store.
  pub fn has_changes(&self) -> bool {
    !self.added.is_empty() || !self.removed.is_empty()
  }
}
