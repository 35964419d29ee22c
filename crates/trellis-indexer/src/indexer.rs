//! The trigger indexer.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};
use trellis_expression::{ExpressionEvaluator, MiniJinjaEvaluator};
use trellis_store::TriggerStore;
use trellis_trigger::{IdGenerator, StoredTrigger, TriggerDiff, UuidGenerator, diff};
use trellis_workflow::{FlowchartFlattener, GraphFlattener, Workflow};

use crate::config::IndexerConfig;
use crate::context::IndexingContext;
use crate::error::IndexingError;
use crate::events::{IndexingEvent, IndexingNotifier, NoopNotifier};
use crate::extract::PayloadExtractor;
use crate::result::IndexedWorkflow;

/// Reconciles the stored triggers of workflow definitions with their current
/// activity graphs.
///
/// Runs for the same definition id are serialized; runs for different
/// definitions proceed concurrently.
pub struct TriggerIndexer {
  store: Arc<dyn TriggerStore>,
  flattener: Arc<dyn GraphFlattener>,
  extractor: PayloadExtractor,
  notifier: Arc<dyn IndexingNotifier>,
  locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

/// A claim on one definition's lock.
///
/// Dropping the last claim removes the definition from the lock map.
struct DefinitionLease<'a> {
  locks: &'a Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
  definition_id: String,
  lock: Arc<tokio::sync::Mutex<()>>,
}

impl Drop for DefinitionLease<'_> {
  fn drop(&mut self) {
    let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
    // The map holds one reference and this lease the other.
    let is_last = Arc::strong_count(&self.lock) == 2
      && locks
        .get(&self.definition_id)
        .is_some_and(|lock| Arc::ptr_eq(lock, &self.lock));
    if is_last {
      locks.remove(&self.definition_id);
    }
  }
}

impl TriggerIndexer {
  /// Create an indexer with the default flattener, minijinja evaluator, UUID
  /// ids and no notifications.
  pub fn new(store: Arc<dyn TriggerStore>, config: IndexerConfig) -> Self {
    Self {
      store,
      flattener: Arc::new(FlowchartFlattener),
      extractor: PayloadExtractor::new(
        Arc::new(MiniJinjaEvaluator::new()),
        Arc::new(UuidGenerator),
        config,
      ),
      notifier: Arc::new(NoopNotifier),
      locks: Mutex::new(HashMap::new()),
    }
  }

  pub fn with_notifier(mut self, notifier: impl IndexingNotifier + 'static) -> Self {
    self.notifier = Arc::new(notifier);
    self
  }

  pub fn with_flattener(mut self, flattener: Arc<dyn GraphFlattener>) -> Self {
    self.flattener = flattener;
    self
  }

  pub fn with_evaluator(mut self, evaluator: Arc<dyn ExpressionEvaluator>) -> Self {
    self.extractor.set_evaluator(evaluator);
    self
  }

  pub fn with_id_generator(mut self, id_generator: Arc<dyn IdGenerator>) -> Self {
    self.extractor.set_id_generator(id_generator);
    self
  }

  /// Index the triggers of one workflow.
  ///
  /// Loads the stored triggers of the definition, discovers the candidate set
  /// (empty when the workflow is not published), applies the difference to the
  /// store and publishes [`IndexingEvent::TriggersIndexed`].
  #[instrument(
    name = "index_triggers",
    skip(self, workflow, cancel),
    fields(
      definition_id = %workflow.definition_id(),
      version = workflow.identity.version,
    )
  )]
  pub async fn index_triggers(
    &self,
    workflow: &Workflow,
    cancel: CancellationToken,
  ) -> Result<IndexedWorkflow, IndexingError> {
    debug!(is_published = workflow.is_published(), "indexing_started");

    let result = self.run(workflow, &cancel).await;

    match &result {
      Ok(indexed) => info!(
        added = indexed.added.len(),
        removed = indexed.removed.len(),
        unchanged = indexed.unchanged.len(),
        "indexing_completed"
      ),
      Err(e) => error!(stage = e.stage(), error = %e, "indexing_failed"),
    }

    result
  }

  /// Index several workflows one after another, stopping at the first error.
  pub async fn index_many(
    &self,
    workflows: &[Workflow],
    cancel: CancellationToken,
  ) -> Result<Vec<IndexedWorkflow>, IndexingError> {
    let mut results = Vec::with_capacity(workflows.len());
    for workflow in workflows {
      results.push(self.index_triggers(workflow, cancel.clone()).await?);
    }
    Ok(results)
  }

  /// Remove every stored trigger of a workflow definition.
  ///
  /// Used when a definition is deleted outright. Publishes
  /// [`IndexingEvent::TriggersDeleted`] and returns the removed triggers.
  #[instrument(name = "delete_triggers", skip(self, cancel))]
  pub async fn delete_triggers(
    &self,
    definition_id: &str,
    cancel: CancellationToken,
  ) -> Result<Vec<StoredTrigger>, IndexingError> {
    let lease = self.definition_lock(definition_id);
    let _guard = cancellable(&cancel, lease.lock.lock()).await?;

    let removed = cancellable(&cancel, self.store.find_by_definition_id(definition_id))
      .await?
      .map_err(|source| IndexingError::StoreRead {
        definition_id: definition_id.to_string(),
        source,
      })?;

    cancellable(&cancel, self.store.delete_by_definition_id(definition_id))
      .await?
      .map_err(|source| IndexingError::StoreWrite {
        definition_id: definition_id.to_string(),
        source,
      })?;

    let event = IndexingEvent::TriggersDeleted {
      definition_id: definition_id.to_string(),
      removed: removed.clone(),
    };
    self.publish(event, &cancel).await?;

    info!(removed = removed.len(), "triggers_removed");
    Ok(removed)
  }

  async fn run(
    &self,
    workflow: &Workflow,
    cancel: &CancellationToken,
  ) -> Result<IndexedWorkflow, IndexingError> {
    let definition_id = workflow.definition_id();
    let lease = self.definition_lock(definition_id);
    let _guard = cancellable(cancel, lease.lock.lock()).await?;

    let current = cancellable(cancel, self.store.find_by_definition_id(definition_id))
      .await?
      .map_err(|source| IndexingError::StoreRead {
        definition_id: definition_id.to_string(),
        source,
      })?;

    let candidates = if workflow.is_published() {
      self.discover(workflow, cancel).await?
    } else {
      Vec::new()
    };

    let delta = diff(current, candidates);
    if delta.is_empty() {
      debug!(unchanged = delta.unchanged.len(), "triggers_up_to_date");
    }
    let TriggerDiff {
      added,
      removed,
      unchanged,
    } = delta;

    if cancel.is_cancelled() {
      return Err(IndexingError::Cancelled);
    }

    cancellable(cancel, self.store.replace(&removed, &added))
      .await?
      .map_err(|source| IndexingError::StoreWrite {
        definition_id: definition_id.to_string(),
        source,
      })?;

    let indexed = IndexedWorkflow {
      workflow: workflow.clone(),
      added,
      removed,
      unchanged,
    };
    self
      .publish(IndexingEvent::TriggersIndexed(indexed.clone()), cancel)
      .await?;

    Ok(indexed)
  }

  /// Walk the graph and extract the candidate set from every start activity.
  async fn discover(
    &self,
    workflow: &Workflow,
    cancel: &CancellationToken,
  ) -> Result<Vec<StoredTrigger>, IndexingError> {
    let nodes =
      self
        .flattener
        .flatten(&workflow.root)
        .map_err(|source| IndexingError::GraphWalk {
          definition_id: workflow.definition_id().to_string(),
          source,
        })?;

    let mut ctx = IndexingContext::new(workflow, cancel.clone());
    let mut candidates = Vec::new();

    for node in nodes.iter().filter(|n| n.activity.can_start_workflow) {
      if ctx.is_cancelled() {
        return Err(IndexingError::Cancelled);
      }
      candidates.extend(self.extractor.extract(&mut ctx, node).await?);
    }

    debug!(
      nodes = nodes.len(),
      candidates = candidates.len(),
      registers = ctx.register_count(),
      "triggers_discovered"
    );
    Ok(candidates)
  }

  async fn publish(
    &self,
    event: IndexingEvent,
    cancel: &CancellationToken,
  ) -> Result<(), IndexingError> {
    let definition_id = event.definition_id().to_string();
    cancellable(cancel, self.notifier.notify(event))
      .await?
      .map_err(|source| IndexingError::Notify {
        definition_id,
        source,
      })
  }

  fn definition_lock(&self, definition_id: &str) -> DefinitionLease<'_> {
    let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
    let lock = locks.entry(definition_id.to_string()).or_default().clone();
    DefinitionLease {
      locks: &self.locks,
      definition_id: definition_id.to_string(),
      lock,
    }
  }

  #[cfg(test)]
  fn tracked_definitions(&self) -> usize {
    self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
  }
}

/// Await `future` unless the token is cancelled first.
async fn cancellable<F: Future>(
  cancel: &CancellationToken,
  future: F,
) -> Result<F::Output, IndexingError> {
  tokio::select! {
    biased;
    _ = cancel.cancelled() => Err(IndexingError::Cancelled),
    output = future => Ok(output),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use trellis_store::InMemoryTriggerStore;
  use trellis_workflow::Activity;

  fn indexer() -> TriggerIndexer {
    TriggerIndexer::new(Arc::new(InMemoryTriggerStore::new()), IndexerConfig::default())
  }

  fn workflow(definition_id: &str) -> Workflow {
    let start = Activity::simple("start", "Start").with_can_start_workflow(true);
    Workflow::new(definition_id, 1, definition_id, true, start)
  }

  #[tokio::test]
  async fn test_lock_map_is_pruned_after_runs() {
    let indexer = indexer();

    for id in ["orders", "billing", "shipping"] {
      indexer
        .index_triggers(&workflow(id), CancellationToken::new())
        .await
        .unwrap();
    }
    indexer
      .delete_triggers("never-indexed", CancellationToken::new())
      .await
      .unwrap();

    assert_eq!(indexer.tracked_definitions(), 0);
  }

  #[tokio::test]
  async fn test_lock_is_kept_while_claimed() {
    let indexer = indexer();

    let first = indexer.definition_lock("orders");
    let second = indexer.definition_lock("orders");
    assert!(Arc::ptr_eq(&first.lock, &second.lock));

    drop(first);
    assert_eq!(indexer.tracked_definitions(), 1);

    drop(second);
    assert_eq!(indexer.tracked_definitions(), 0);
  }

  #[tokio::test]
  async fn test_lock_is_pruned_after_cancelled_wait() {
    let indexer = indexer();
    let held = indexer.definition_lock("orders");
    let guard = held.lock.lock().await;

    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = indexer
      .index_triggers(&workflow("orders"), cancel)
      .await
      .unwrap_err();
    assert!(matches!(err, IndexingError::Cancelled));
    assert_eq!(indexer.tracked_definitions(), 1);

    drop(guard);
    drop(held);
    assert_eq!(indexer.tracked_definitions(), 0);
  }
}
