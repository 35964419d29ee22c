//! Trellis Store
//!
//! This crate provides the storage trait and implementations for stored
//! triggers. The indexer only ever reads triggers of one workflow definition
//! and applies deltas through [`TriggerStore::replace`]; listeners look
//! triggers up by type name.
//!
//! Implementations:
//! - [`SqliteTriggerStore`]: SQLite via sqlx, `replace` runs in one transaction
//! - [`InMemoryTriggerStore`]: a lock-guarded vector, for tests and embedding

mod memory;
mod sqlite;

pub use memory::InMemoryTriggerStore;
pub use sqlite::SqliteTriggerStore;

use async_trait::async_trait;
use trellis_trigger::StoredTrigger;

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  /// A database error occurred.
  #[error("database error: {0}")]
  Database(#[from] sqlx::Error),

  /// Applying migrations failed.
  #[error("migration error: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),
}

/// Storage trait for stored triggers.
#[async_trait]
pub trait TriggerStore: Send + Sync {
  /// All triggers stored for a workflow definition.
  async fn find_by_definition_id(
    &self,
    workflow_definition_id: &str,
  ) -> Result<Vec<StoredTrigger>, StoreError>;

  /// All triggers of one trigger type, across workflow definitions.
  async fn find_by_name(&self, name: &str) -> Result<Vec<StoredTrigger>, StoreError>;

  /// Delete every trigger of a workflow definition. Returns the number of rows removed.
  async fn delete_by_definition_id(&self, workflow_definition_id: &str) -> Result<u64, StoreError>;

  /// Delete `removed` (by id) and insert `added` as one atomic change.
  ///
  /// Readers never observe a state where only part of the change is applied.
  async fn replace(
    &self,
    removed: &[StoredTrigger],
    added: &[StoredTrigger],
  ) -> Result<(), StoreError>;
}
