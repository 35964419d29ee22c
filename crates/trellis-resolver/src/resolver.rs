use std::collections::HashSet;
use std::sync::Arc;

use trellis_config::{ActivityDef, Connection, InputDef, WorkflowDef};
use trellis_expression::{BoundInput, Expression};
use trellis_workflow::{Activity, Capability, Flowchart, Workflow};

use crate::error::ResolveError;
use crate::registry::{ActivityKind, ActivityRegistry};

/// Resolver transforms a WorkflowDef into an indexable Workflow.
pub trait Resolver: Send + Sync {
  /// Resolve a workflow definition.
  ///
  /// This process:
  /// 1. Looks up every activity type in the registry
  /// 2. Validates activity ids (unique across the workflow) and connections
  /// 3. Decides each activity's capability once, building triggers from their inputs
  fn resolve(&self, def: WorkflowDef) -> Result<Workflow, ResolveError>;
}

/// Standard resolver implementation backed by an activity registry.
pub struct StandardResolver {
  registry: ActivityRegistry,
}

impl StandardResolver {
  /// Create a new resolver with the given activity registry.
  pub fn new(registry: ActivityRegistry) -> Self {
    Self { registry }
  }

  /// Resolve one activity definition, recursing into containers.
  fn resolve_activity(
    &self,
    def: ActivityDef,
    seen: &mut HashSet<String>,
  ) -> Result<Activity, ResolveError> {
    if !seen.insert(def.activity_id.clone()) {
      return Err(ResolveError::DuplicateActivityId {
        activity_id: def.activity_id,
      });
    }

    let descriptor =
      self
        .registry
        .get(&def.type_name)
        .ok_or_else(|| ResolveError::UnknownActivityType {
          activity_id: def.activity_id.clone(),
          type_name: def.type_name.clone(),
        })?;

    if !def.activities.is_empty() && !matches!(descriptor.kind, ActivityKind::Container) {
      return Err(ResolveError::NotAContainer {
        activity_id: def.activity_id,
        type_name: def.type_name,
      });
    }

    let can_start_workflow = def
      .can_start_workflow
      .unwrap_or(descriptor.can_start_workflow);

    let (capability, flowchart) = match &descriptor.kind {
      ActivityKind::Simple => (Capability::Simple, None),
      ActivityKind::Trigger(factory) => {
        let inputs = def
          .inputs
          .into_iter()
          .map(|(target, input)| BoundInput::new(target, to_expression(input)))
          .collect();
        (Capability::Trigger(factory(inputs)), None)
      }
      ActivityKind::Container => {
        let flowchart =
          self.resolve_flowchart(&def.activity_id, def.activities, def.connections, seen)?;
        (Capability::Simple, Some(flowchart))
      }
    };

    Ok(Activity {
      activity_id: def.activity_id,
      type_name: def.type_name,
      can_start_workflow,
      capability,
      flowchart,
    })
  }

  fn resolve_flowchart(
    &self,
    container_id: &str,
    activities: Vec<ActivityDef>,
    connections: Vec<Connection>,
    seen: &mut HashSet<String>,
  ) -> Result<Flowchart, ResolveError> {
    let child_ids: HashSet<&str> = activities.iter().map(|a| a.activity_id.as_str()).collect();
    for connection in &connections {
      for endpoint in [&connection.from, &connection.to] {
        if !child_ids.contains(endpoint.as_str()) {
          return Err(ResolveError::InvalidConnection {
            container_id: container_id.to_string(),
            activity_id: endpoint.clone(),
          });
        }
      }
    }

    let mut resolved = Vec::with_capacity(activities.len());
    for child in activities {
      resolved.push(Arc::new(self.resolve_activity(child, seen)?));
    }

    Ok(Flowchart {
      activities: resolved,
      connections: connections.into_iter().map(|c| (c.from, c.to)).collect(),
    })
  }
}

impl Default for StandardResolver {
  fn default() -> Self {
    Self::new(ActivityRegistry::with_builtins())
  }
}

impl Resolver for StandardResolver {
  fn resolve(&self, def: WorkflowDef) -> Result<Workflow, ResolveError> {
    let mut seen = HashSet::new();
    let root = self.resolve_activity(def.root, &mut seen)?;
    Ok(Workflow::new(
      def.definition_id,
      def.version,
      def.name,
      def.is_published,
      root,
    ))
  }
}

fn to_expression(input: InputDef) -> Expression {
  match input {
    InputDef::Expression { expression } => Expression::Jinja(expression),
    InputDef::Literal(value) => Expression::Literal(value),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn resolve(value: serde_json::Value) -> Result<Workflow, ResolveError> {
    let def: WorkflowDef = serde_json::from_value(value).unwrap();
    StandardResolver::default().resolve(def)
  }

  #[test]
  fn test_resolves_capabilities() {
    let workflow = resolve(json!({
      "definition_id": "orders",
      "version": 2,
      "name": "Orders",
      "is_published": true,
      "root": {
        "activity_id": "flow",
        "type": "Flowchart",
        "activities": [
          {
            "activity_id": "hook",
            "type": "HttpEndpoint",
            "inputs": {
              "path": { "expression": "'/hooks/' ~ workflow.definition_id" },
              "methods": ["POST"]
            }
          },
          { "activity_id": "start", "type": "Start" },
          { "activity_id": "log", "type": "Log" }
        ],
        "connections": [{ "from": "hook", "to": "log" }]
      }
    }))
    .unwrap();

    assert_eq!(workflow.definition_id(), "orders");
    assert_eq!(workflow.identity.version, 2);
    assert!(workflow.is_published());

    let flowchart = workflow.root.flowchart.as_ref().unwrap();
    let hook = flowchart.get_activity("hook").unwrap();
    assert!(hook.can_start_workflow);
    let trigger = hook.as_trigger().unwrap();
    assert_eq!(trigger.bound_inputs().len(), 2);
    assert_eq!(
      trigger.bound_inputs()[1],
      BoundInput::new("path", Expression::jinja("'/hooks/' ~ workflow.definition_id"))
    );

    assert!(flowchart.get_activity("start").unwrap().can_start_workflow);
    assert!(!flowchart.get_activity("log").unwrap().can_start_workflow);
    assert!(!workflow.root.can_start_workflow);
  }

  #[test]
  fn test_can_start_workflow_override() {
    let workflow = resolve(json!({
      "definition_id": "wf",
      "name": "wf",
      "root": { "activity_id": "log", "type": "Log", "can_start_workflow": true }
    }))
    .unwrap();
    assert!(workflow.root.can_start_workflow);
    assert!(workflow.root.as_trigger().is_none());
  }

  #[test]
  fn test_unknown_type() {
    let err = resolve(json!({
      "definition_id": "wf",
      "name": "wf",
      "root": { "activity_id": "x", "type": "Teleport" }
    }))
    .unwrap_err();
    assert!(matches!(err, ResolveError::UnknownActivityType { .. }));
  }

  #[test]
  fn test_duplicate_ids_across_levels() {
    let err = resolve(json!({
      "definition_id": "wf",
      "name": "wf",
      "root": {
        "activity_id": "flow",
        "type": "Flowchart",
        "activities": [
          { "activity_id": "a", "type": "Start" },
          {
            "activity_id": "inner",
            "type": "Sequence",
            "activities": [{ "activity_id": "a", "type": "Log" }]
          }
        ]
      }
    }))
    .unwrap_err();
    assert!(matches!(err, ResolveError::DuplicateActivityId { activity_id } if activity_id == "a"));
  }

  #[test]
  fn test_invalid_connection() {
    let err = resolve(json!({
      "definition_id": "wf",
      "name": "wf",
      "root": {
        "activity_id": "flow",
        "type": "Flowchart",
        "activities": [{ "activity_id": "a", "type": "Start" }],
        "connections": [{ "from": "a", "to": "b" }]
      }
    }))
    .unwrap_err();
    assert!(matches!(err, ResolveError::InvalidConnection { .. }));
  }

  #[test]
  fn test_leaf_with_children_is_rejected() {
    let err = resolve(json!({
      "definition_id": "wf",
      "name": "wf",
      "root": {
        "activity_id": "start",
        "type": "Start",
        "activities": [{ "activity_id": "a", "type": "Log" }]
      }
    }))
    .unwrap_err();
    assert!(matches!(err, ResolveError::NotAContainer { .. }));
  }
}
