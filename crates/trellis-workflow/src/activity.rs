use std::sync::Arc;

use trellis_trigger::Trigger;

use crate::graph::Graph;

/// What an activity can do, decided once when the activity is built.
#[derive(Debug, Clone)]
pub enum Capability {
  /// No trigger data. As a start activity it only records that the workflow
  /// can be started explicitly.
  Simple,
  /// Produces trigger payloads from its bound inputs.
  Trigger(Arc<dyn Trigger>),
}

impl Capability {
  pub fn as_trigger(&self) -> Option<&dyn Trigger> {
    match self {
      Self::Simple => None,
      Self::Trigger(trigger) => Some(trigger.as_ref()),
    }
  }
}

/// Child activities of a container plus the connections between them.
#[derive(Debug, Clone, Default)]
pub struct Flowchart {
  pub activities: Vec<Arc<Activity>>,
  pub connections: Vec<(String, String)>,
}

impl Flowchart {
  /// Build the graph structure for traversal.
  pub fn graph(&self) -> Graph {
    let ids: Vec<String> = self
      .activities
      .iter()
      .map(|a| a.activity_id.clone())
      .collect();
    Graph::new(&ids, &self.connections)
  }

  pub fn get_activity(&self, activity_id: &str) -> Option<&Arc<Activity>> {
    self
      .activities
      .iter()
      .find(|a| a.activity_id == activity_id)
  }
}

/// An activity in a resolved workflow.
#[derive(Debug, Clone)]
pub struct Activity {
  pub activity_id: String,
  pub type_name: String,
  pub can_start_workflow: bool,
  pub capability: Capability,
  /// Present for container activities.
  pub flowchart: Option<Flowchart>,
}

impl Activity {
  /// A leaf activity without trigger capability.
  pub fn simple(activity_id: impl Into<String>, type_name: impl Into<String>) -> Self {
    Self {
      activity_id: activity_id.into(),
      type_name: type_name.into(),
      can_start_workflow: false,
      capability: Capability::Simple,
      flowchart: None,
    }
  }

  /// A leaf activity with trigger capability. Triggers can start the workflow.
  pub fn trigger(
    activity_id: impl Into<String>,
    type_name: impl Into<String>,
    trigger: Arc<dyn Trigger>,
  ) -> Self {
    Self {
      activity_id: activity_id.into(),
      type_name: type_name.into(),
      can_start_workflow: true,
      capability: Capability::Trigger(trigger),
      flowchart: None,
    }
  }

  /// A container activity holding a flowchart.
  pub fn container(
    activity_id: impl Into<String>,
    type_name: impl Into<String>,
    flowchart: Flowchart,
  ) -> Self {
    Self {
      activity_id: activity_id.into(),
      type_name: type_name.into(),
      can_start_workflow: false,
      capability: Capability::Simple,
      flowchart: Some(flowchart),
    }
  }

  pub fn with_can_start_workflow(mut self, can_start_workflow: bool) -> Self {
    self.can_start_workflow = can_start_workflow;
    self
  }

  pub fn as_trigger(&self) -> Option<&dyn Trigger> {
    self.capability.as_trigger()
  }
}

/// One entry of a flattened activity graph.
#[derive(Debug, Clone)]
pub struct ActivityNode {
  pub activity: Arc<Activity>,
  pub parent_id: Option<String>,
  pub children: Vec<String>,
}

impl ActivityNode {
  pub fn activity_id(&self) -> &str {
    &self.activity.activity_id
  }
}
