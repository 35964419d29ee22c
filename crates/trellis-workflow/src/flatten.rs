//! Flattening of activity trees into traversal-ordered node lists.

use std::collections::HashSet;
use std::sync::Arc;

use crate::activity::{Activity, ActivityNode};
use crate::error::WorkflowError;

/// Turns a root activity into a flat, traversal-ordered list of nodes.
pub trait GraphFlattener: Send + Sync {
  fn flatten(&self, root: &Arc<Activity>) -> Result<Vec<ActivityNode>, WorkflowError>;
}

/// Depth-first flattener for flowchart containers.
///
/// A container is emitted before its children. Children are visited in
/// [`Graph::traversal_order`](crate::Graph::traversal_order), and each child's
/// own subtree is emitted before its next sibling.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlowchartFlattener;

impl GraphFlattener for FlowchartFlattener {
  fn flatten(&self, root: &Arc<Activity>) -> Result<Vec<ActivityNode>, WorkflowError> {
    let mut nodes = Vec::new();
    let mut seen = HashSet::new();
    visit(root, None, &mut seen, &mut nodes)?;
    Ok(nodes)
  }
}

fn visit(
  activity: &Arc<Activity>,
  parent_id: Option<&str>,
  seen: &mut HashSet<String>,
  nodes: &mut Vec<ActivityNode>,
) -> Result<(), WorkflowError> {
  if !seen.insert(activity.activity_id.clone()) {
    return Err(WorkflowError::DuplicateActivity(
      activity.activity_id.clone(),
    ));
  }

  let Some(flowchart) = &activity.flowchart else {
    nodes.push(ActivityNode {
      activity: activity.clone(),
      parent_id: parent_id.map(str::to_string),
      children: Vec::new(),
    });
    return Ok(());
  };

  let mut siblings = HashSet::with_capacity(flowchart.activities.len());
  for child in &flowchart.activities {
    if !siblings.insert(child.activity_id.as_str()) {
      return Err(WorkflowError::DuplicateActivity(child.activity_id.clone()));
    }
  }

  for (from, to) in &flowchart.connections {
    if flowchart.get_activity(from).is_none() || flowchart.get_activity(to).is_none() {
      return Err(WorkflowError::InvalidConnection {
        from: from.clone(),
        to: to.clone(),
      });
    }
  }

  let order = flowchart.graph().traversal_order();
  nodes.push(ActivityNode {
    activity: activity.clone(),
    parent_id: parent_id.map(str::to_string),
    children: order.clone(),
  });

  for child_id in &order {
    if let Some(child) = flowchart.get_activity(child_id) {
      visit(child, Some(&activity.activity_id), seen, nodes)?;
    }
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Flowchart;

  fn flowchart(activities: Vec<Activity>, connections: &[(&str, &str)]) -> Flowchart {
    Flowchart {
      activities: activities.into_iter().map(Arc::new).collect(),
      connections: connections
        .iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect(),
    }
  }

  fn ids(nodes: &[ActivityNode]) -> Vec<&str> {
    nodes.iter().map(|n| n.activity_id()).collect()
  }

  #[test]
  fn test_single_activity() {
    let root = Arc::new(Activity::simple("start", "Start"));
    let nodes = FlowchartFlattener.flatten(&root).unwrap();

    assert_eq!(ids(&nodes), vec!["start"]);
    assert_eq!(nodes[0].parent_id, None);
  }

  #[test]
  fn test_nested_flowcharts_depth_first() {
    let inner = Activity::container(
      "inner",
      "Flowchart",
      flowchart(
        vec![Activity::simple("i2", "Log"), Activity::simple("i1", "Log")],
        &[("i1", "i2")],
      ),
    );
    let root = Arc::new(Activity::container(
      "root",
      "Flowchart",
      flowchart(
        vec![Activity::simple("end", "Log"), inner, Activity::simple("begin", "Start")],
        &[("begin", "inner"), ("inner", "end")],
      ),
    ));

    let nodes = FlowchartFlattener.flatten(&root).unwrap();

    assert_eq!(ids(&nodes), vec!["root", "begin", "inner", "i1", "i2", "end"]);
    assert_eq!(nodes[0].children, vec!["begin", "inner", "end"]);
    assert_eq!(nodes[3].parent_id.as_deref(), Some("inner"));
    assert_eq!(nodes[5].parent_id.as_deref(), Some("root"));
  }

  #[test]
  fn test_duplicate_activity_id_is_rejected() {
    let root = Arc::new(Activity::container(
      "root",
      "Flowchart",
      flowchart(
        vec![Activity::simple("a", "Start"), Activity::simple("a", "Log")],
        &[],
      ),
    ));

    let err = FlowchartFlattener.flatten(&root).unwrap_err();
    assert!(matches!(err, WorkflowError::DuplicateActivity(id) if id == "a"));
  }

  #[test]
  fn test_unknown_connection_is_rejected() {
    let root = Arc::new(Activity::container(
      "root",
      "Flowchart",
      flowchart(vec![Activity::simple("a", "Start")], &[("a", "ghost")]),
    ));

    let err = FlowchartFlattener.flatten(&root).unwrap_err();
    assert!(matches!(err, WorkflowError::InvalidConnection { .. }));
  }
}
