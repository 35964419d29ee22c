//! Indexing errors.

use trellis_store::StoreError;
use trellis_workflow::WorkflowError;

use crate::events::NotifyError;

/// Errors that abort an indexing run.
///
/// Failures of a single input expression or of a single trigger's payload
/// retrieval are contained inside the run and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum IndexingError {
  /// The activity graph could not be flattened.
  #[error("failed to walk activity graph of workflow '{definition_id}'")]
  GraphWalk {
    definition_id: String,
    #[source]
    source: WorkflowError,
  },

  /// Stored triggers could not be loaded.
  #[error("failed to read stored triggers of workflow '{definition_id}'")]
  StoreRead {
    definition_id: String,
    #[source]
    source: StoreError,
  },

  /// The trigger delta could not be applied.
  #[error("failed to write stored triggers of workflow '{definition_id}'")]
  StoreWrite {
    definition_id: String,
    #[source]
    source: StoreError,
  },

  /// The outcome could not be published.
  #[error("failed to publish indexing event for workflow '{definition_id}'")]
  Notify {
    definition_id: String,
    #[source]
    source: NotifyError,
  },

  /// The run was cancelled.
  #[error("indexing cancelled")]
  Cancelled,
}

impl IndexingError {
  /// Name of the stage that failed, for logs and metrics labels.
  pub fn stage(&self) -> &'static str {
    match self {
      Self::GraphWalk { .. } => "graph_walk",
      Self::StoreRead { .. } => "store_read",
      Self::StoreWrite { .. } => "store_write",
      Self::Notify { .. } => "notify",
      Self::Cancelled => "cancelled",
    }
  }
}
