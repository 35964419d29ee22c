use async_trait::async_trait;
use tokio::sync::RwLock;
use trellis_trigger::StoredTrigger;

use crate::{StoreError, TriggerStore};

/// In-memory trigger store.
///
/// `replace` holds the write lock for the whole change, so readers see either
/// the old or the new set.
#[derive(Debug, Default)]
pub struct InMemoryTriggerStore {
  triggers: RwLock<Vec<StoredTrigger>>,
}

impl InMemoryTriggerStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Snapshot of every stored trigger, in insertion order.
  pub async fn all(&self) -> Vec<StoredTrigger> {
    self.triggers.read().await.clone()
  }
}

#[async_trait]
impl TriggerStore for InMemoryTriggerStore {
  async fn find_by_definition_id(
    &self,
    workflow_definition_id: &str,
  ) -> Result<Vec<StoredTrigger>, StoreError> {
    Ok(
      self
        .triggers
        .read()
        .await
        .iter()
        .filter(|t| t.workflow_definition_id == workflow_definition_id)
        .cloned()
        .collect(),
    )
  }

  async fn find_by_name(&self, name: &str) -> Result<Vec<StoredTrigger>, StoreError> {
    Ok(
      self
        .triggers
        .read()
        .await
        .iter()
        .filter(|t| t.name == name)
        .cloned()
        .collect(),
    )
  }

  async fn delete_by_definition_id(&self, workflow_definition_id: &str) -> Result<u64, StoreError> {
    let mut triggers = self.triggers.write().await;
    let before = triggers.len();
    triggers.retain(|t| t.workflow_definition_id != workflow_definition_id);
    Ok((before - triggers.len()) as u64)
  }

  async fn replace(
    &self,
    removed: &[StoredTrigger],
    added: &[StoredTrigger],
  ) -> Result<(), StoreError> {
    let mut triggers = self.triggers.write().await;
    triggers.retain(|t| !removed.iter().any(|r| r.id == t.id));
    triggers.extend(added.iter().cloned());
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[tokio::test]
  async fn test_replace_and_find() {
    let store = InMemoryTriggerStore::new();
    let cron = StoredTrigger::with_payload("1", "wf", "Cron", "tick", &json!({ "cron": "0 * * * *" }));
    let start = StoredTrigger::simple("2", "wf", "Start", "start");
    let other = StoredTrigger::simple("3", "other", "Start", "start");

    store
      .replace(&[], &[cron.clone(), start.clone(), other.clone()])
      .await
      .unwrap();
    assert_eq!(store.find_by_definition_id("wf").await.unwrap().len(), 2);
    assert_eq!(store.find_by_name("Start").await.unwrap().len(), 2);

    store.replace(&[cron], &[]).await.unwrap();
    let remaining = store.find_by_definition_id("wf").await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, "2");

    assert_eq!(store.delete_by_definition_id("wf").await.unwrap(), 1);
    assert_eq!(store.all().await, vec![other]);
  }
}
