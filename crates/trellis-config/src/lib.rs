//! Trellis Config
//!
//! This crate contains the serializable workflow definition types for Trellis.
//! These types describe a workflow as it is published: an activity tree whose
//! containers (flowcharts) hold child activities and the connections between them.
//!
//! Definitions can be loaded from:
//! - JSON files (via the CLI, `trellis index workflow.json`)
//! - Database storage (as JSON blobs)
//!
//! The resolver takes these types, validates them against the activity registry,
//! and builds the runtime `Workflow` used by the trigger indexer.

mod activity;
mod connection;
mod input;
mod workflow;

pub use activity::ActivityDef;
pub use connection::Connection;
pub use input::InputDef;
pub use workflow::WorkflowDef;
