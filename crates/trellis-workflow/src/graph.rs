use std::collections::{HashMap, HashSet, VecDeque};

/// Connection graph of one flowchart, for traversal.
#[derive(Debug, Clone)]
pub struct Graph {
  /// Activity ids in declaration order.
  nodes: Vec<String>,
  /// Adjacency list: activity_id -> list of downstream activity_ids.
  adjacency: HashMap<String, Vec<String>>,
  /// Activities with no incoming connections, in declaration order.
  entry_points: Vec<String>,
}

impl Graph {
  /// Build a graph from activity ids and connections.
  pub fn new(nodes: &[String], edges: &[(String, String)]) -> Self {
    let mut adjacency: HashMap<String, Vec<String>> = HashMap::new();
    let mut targets: HashSet<&str> = HashSet::new();

    for node_id in nodes {
      adjacency.entry(node_id.clone()).or_default();
    }

    for (from, to) in edges {
      adjacency.entry(from.clone()).or_default().push(to.clone());
      targets.insert(to.as_str());
    }

    let entry_points: Vec<String> = nodes
      .iter()
      .filter(|id| !targets.contains(id.as_str()))
      .cloned()
      .collect();

    Self {
      nodes: nodes.to_vec(),
      adjacency,
      entry_points,
    }
  }

  /// Get entry points (activities with no incoming connections).
  pub fn entry_points(&self) -> &[String] {
    &self.entry_points
  }

  /// Get downstream activities for a given activity.
  pub fn downstream(&self, node_id: &str) -> &[String] {
    self
      .adjacency
      .get(node_id)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// Breadth-first order from the entry points, followed by any activity not
  /// reachable from them (e.g. members of a cycle) in declaration order.
  ///
  /// Every activity appears exactly once, so this terminates on cyclic graphs.
  pub fn traversal_order(&self) -> Vec<String> {
    let mut visited: HashSet<&str> = HashSet::with_capacity(self.nodes.len());
    let mut order = Vec::with_capacity(self.nodes.len());
    let mut queue: VecDeque<&str> = VecDeque::new();

    let starts = self
      .entry_points()
      .iter()
      .chain(self.nodes.iter())
      .map(String::as_str);

    for start in starts {
      if !visited.insert(start) {
        continue;
      }
      queue.push_back(start);

      while let Some(node_id) = queue.pop_front() {
        order.push(node_id.to_string());
        for next in self.downstream(node_id) {
          if visited.insert(next.as_str()) {
            queue.push_back(next.as_str());
          }
        }
      }
    }

    order
  }
}
