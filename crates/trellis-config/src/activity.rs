use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::connection::Connection;
use crate::input::InputDef;

/// An activity as written in a workflow definition.
///
/// Container activities (e.g. `Flowchart`) carry child `activities` and the
/// `connections` between them. Leaf activities leave both empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityDef {
  pub activity_id: String,
  /// Registered activity type name, e.g. "Timer" or "Flowchart".
  #[serde(rename = "type")]
  pub type_name: String,
  /// Overrides the registry default for whether this activity may start the workflow.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub can_start_workflow: Option<bool>,
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub inputs: BTreeMap<String, InputDef>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub activities: Vec<ActivityDef>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub connections: Vec<Connection>,
}

impl ActivityDef {
  /// Create a leaf activity with no inputs.
  pub fn new(activity_id: impl Into<String>, type_name: impl Into<String>) -> Self {
    Self {
      activity_id: activity_id.into(),
      type_name: type_name.into(),
      can_start_workflow: None,
      inputs: BTreeMap::new(),
      activities: Vec::new(),
      connections: Vec::new(),
    }
  }

  pub fn with_input(mut self, name: impl Into<String>, input: InputDef) -> Self {
    self.inputs.insert(name.into(), input);
    self
  }

  pub fn with_activity(mut self, activity: ActivityDef) -> Self {
    self.activities.push(activity);
    self
  }

  pub fn with_connection(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
    self.connections.push(Connection {
      from: from.into(),
      to: to.into(),
    });
    self
  }
}
