//! Trellis Indexer
//!
//! This crate keeps the stored trigger registry in sync with published
//! workflow definitions.
//!
//! # Architecture
//!
//! ```text
//! TriggerIndexer
//! ├── index_triggers(workflow, cancel) -> IndexedWorkflow
//! │   ├── store.find_by_definition_id     current set
//! │   ├── flattener.flatten(root)         (published only)
//! │   ├── PayloadExtractor per start node candidate set
//! │   ├── diff(current, candidate)        added / removed / unchanged
//! │   ├── store.replace(removed, added)
//! │   └── notifier.notify(TriggersIndexed)
//! ├── index_many(workflows, cancel)
//! └── delete_triggers(definition_id, cancel)
//!
//! PayloadExtractor
//! └── extract(context, node) - evaluate bound inputs into the activity's
//!     register, then ask the trigger for payloads
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use trellis_indexer::{IndexerConfig, TriggerIndexer};
//! use tokio_util::sync::CancellationToken;
//!
//! let store = Arc::new(SqliteTriggerStore::open(&path).await?);
//! let indexer = TriggerIndexer::new(store, IndexerConfig::default());
//!
//! let result = indexer.index_triggers(&workflow, CancellationToken::new()).await?;
//! println!("added {}, removed {}", result.added.len(), result.removed.len());
//! ```

mod config;
mod context;
mod error;
mod events;
mod extract;
mod indexer;
mod result;

pub use config::IndexerConfig;
pub use context::IndexingContext;
pub use error::IndexingError;
pub use events::{
  ChannelNotifier, IndexingEvent, IndexingNotifier, LogNotifier, NoopNotifier, NotifyError,
};
pub use extract::PayloadExtractor;
pub use indexer::TriggerIndexer;
pub use result::IndexedWorkflow;
