use serde::{Deserialize, Serialize};

use crate::activity::ActivityDef;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDef {
  pub definition_id: String,
  #[serde(default = "default_version")]
  pub version: u32,
  pub name: String,
  #[serde(default)]
  pub is_published: bool,
  pub root: ActivityDef,
}

fn default_version() -> u32 {
  1
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::InputDef;
  use serde_json::json;

  #[test]
  fn test_parse_workflow_def() {
    let def: WorkflowDef = serde_json::from_value(json!({
      "definition_id": "orders",
      "name": "Order sync",
      "is_published": true,
      "root": {
        "activity_id": "flow",
        "type": "Flowchart",
        "activities": [
          { "activity_id": "tick", "type": "Cron", "inputs": { "cron_expression": "*/5 * * * *" } },
          { "activity_id": "start", "type": "Start" }
        ],
        "connections": [{ "from": "tick", "to": "start" }]
      }
    }))
    .unwrap();

    assert_eq!(def.version, 1);
    assert!(def.is_published);
    assert_eq!(def.root.activities.len(), 2);
    assert_eq!(
      def.root.activities[0].inputs["cron_expression"],
      InputDef::literal("*/5 * * * *")
    );
    assert_eq!(def.root.connections[0].to, "start");
  }

  #[test]
  fn test_unpublished_by_default() {
    let def: WorkflowDef = serde_json::from_value(json!({
      "definition_id": "draft",
      "name": "Draft",
      "root": { "activity_id": "start", "type": "Start" }
    }))
    .unwrap();

    assert!(!def.is_published);
    assert!(def.root.activities.is_empty());
  }
}
