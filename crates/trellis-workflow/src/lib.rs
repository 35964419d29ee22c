//! Trellis Workflow
//!
//! This crate provides the resolved workflow representation used by the
//! trigger indexer. A resolved workflow is an activity tree whose capabilities
//! (simple start activity or trigger) were decided once, when each activity
//! was built from its definition.
//!
//! Key pieces:
//! - [`Workflow`]: identity, publication state and root activity
//! - [`Activity`] and [`Capability`]: an activity and what it can do
//! - [`Flowchart`] and [`Graph`]: container activities and their connections
//! - [`GraphFlattener`]: turns the tree into a traversal-ordered node list

mod activity;
mod error;
mod flatten;
mod graph;
mod workflow;

pub use activity::{Activity, ActivityNode, Capability, Flowchart};
pub use error::WorkflowError;
pub use flatten::{FlowchartFlattener, GraphFlattener};
pub use graph::Graph;
pub use workflow::{Publication, Workflow, WorkflowIdentity};
