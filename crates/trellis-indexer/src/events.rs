//! Indexing events and notifiers.
//!
//! Every successful indexing run publishes one event so that trigger listeners
//! (schedulers, HTTP routers, message consumers) can pick up the delta.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::info;
use trellis_trigger::StoredTrigger;

use crate::result::IndexedWorkflow;

/// Events emitted by the trigger indexer.
#[derive(Debug, Clone)]
pub enum IndexingEvent {
  /// A workflow was indexed; carries the full result.
  TriggersIndexed(IndexedWorkflow),

  /// Every trigger of a workflow definition was deleted.
  TriggersDeleted {
    definition_id: String,
    removed: Vec<StoredTrigger>,
  },
}

impl IndexingEvent {
  pub fn definition_id(&self) -> &str {
    match self {
      Self::TriggersIndexed(result) => result.definition_id(),
      Self::TriggersDeleted { definition_id, .. } => definition_id,
    }
  }
}

/// Error type for event publication.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
  /// The receiving side of the channel is gone.
  #[error("notification channel closed")]
  ChannelClosed,

  /// A custom notifier failed.
  #[error("notification failed: {0}")]
  Failed(String),
}

/// Trait for publishing indexing events.
///
/// The indexer awaits `notify` once per run. An error fails the run.
#[async_trait]
pub trait IndexingNotifier: Send + Sync {
  async fn notify(&self, event: IndexingEvent) -> Result<(), NotifyError>;
}

/// A no-op notifier that discards all events.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

#[async_trait]
impl IndexingNotifier for NoopNotifier {
  async fn notify(&self, _event: IndexingEvent) -> Result<(), NotifyError> {
    Ok(())
  }
}

/// A notifier that writes a summary of each event to the log.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl IndexingNotifier for LogNotifier {
  async fn notify(&self, event: IndexingEvent) -> Result<(), NotifyError> {
    match &event {
      IndexingEvent::TriggersIndexed(result) => info!(
        definition_id = %result.definition_id(),
        added = result.added.len(),
        removed = result.removed.len(),
        unchanged = result.unchanged.len(),
        "triggers_indexed"
      ),
      IndexingEvent::TriggersDeleted {
        definition_id,
        removed,
      } => info!(
        definition_id = %definition_id,
        removed = removed.len(),
        "triggers_deleted"
      ),
    }
    Ok(())
  }
}

/// A notifier that sends events to an unbounded channel.
///
/// A dropped receiver is reported as [`NotifyError::ChannelClosed`].
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
  sender: mpsc::UnboundedSender<IndexingEvent>,
}

impl ChannelNotifier {
  pub fn new(sender: mpsc::UnboundedSender<IndexingEvent>) -> Self {
    Self { sender }
  }

  /// Create a notifier together with the receiving end of its channel.
  pub fn channel() -> (Self, mpsc::UnboundedReceiver<IndexingEvent>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (Self::new(sender), receiver)
  }
}

#[async_trait]
impl IndexingNotifier for ChannelNotifier {
  async fn notify(&self, event: IndexingEvent) -> Result<(), NotifyError> {
    self
      .sender
      .send(event)
      .map_err(|_| NotifyError::ChannelClosed)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn deleted() -> IndexingEvent {
    IndexingEvent::TriggersDeleted {
      definition_id: "wf".to_string(),
      removed: vec![StoredTrigger::simple("1", "wf", "Start", "start")],
    }
  }

  #[tokio::test]
  async fn test_channel_notifier_delivers() {
    let (notifier, mut receiver) = ChannelNotifier::channel();
    notifier.notify(deleted()).await.unwrap();

    let event = receiver.recv().await.unwrap();
    assert_eq!(event.definition_id(), "wf");
  }

  #[tokio::test]
  async fn test_channel_notifier_reports_closed_channel() {
    let (notifier, receiver) = ChannelNotifier::channel();
    drop(receiver);

    let err = notifier.notify(deleted()).await.unwrap_err();
    assert!(matches!(err, NotifyError::ChannelClosed));
  }
}
