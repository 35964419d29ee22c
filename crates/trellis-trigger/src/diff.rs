//! Minimal-delta reconciliation of stored trigger sets.

use std::collections::HashSet;

use crate::stored::{StoredTrigger, TriggerKey};

/// Three-way partition of two stored trigger sets.
#[derive(Debug, Clone, Default)]
pub struct TriggerDiff {
  /// In the candidate set but not in the current set.
  pub added: Vec<StoredTrigger>,
  /// In the current set but not in the candidate set.
  pub removed: Vec<StoredTrigger>,
  /// In both; these are the current instances, keeping their original ids.
  pub unchanged: Vec<StoredTrigger>,
}

impl TriggerDiff {
  /// True when applying this diff would not touch the store.
  pub fn is_empty(&self) -> bool {
    self.added.is_empty() && self.removed.is_empty()
  }
}

/// Partition `current` and `candidate` by [`TriggerKey`].
///
/// Output order follows input order. A key that appears more than once in
/// `current` is kept once; the extra rows are reported as removed so the
/// store converges to one row per key. Duplicate candidate keys are added once.
pub fn diff(current: Vec<StoredTrigger>, candidate: Vec<StoredTrigger>) -> TriggerDiff {
  let candidate_keys: HashSet<TriggerKey> = candidate.iter().map(StoredTrigger::key).collect();

  let mut result = TriggerDiff::default();
  let mut current_keys = HashSet::with_capacity(current.len());

  for trigger in current {
    let key = trigger.key();
    if candidate_keys.contains(&key) && current_keys.insert(key) {
      result.unchanged.push(trigger);
    } else {
      result.removed.push(trigger);
    }
  }

  let mut added_keys = HashSet::new();
  for trigger in candidate {
    let key = trigger.key();
    if !current_keys.contains(&key) && added_keys.insert(key) {
      result.added.push(trigger);
    }
  }

  result
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn timer(id: &str, activity: &str, cron: &str) -> StoredTrigger {
    StoredTrigger::with_payload(id, "wf", "Timer", activity, &json!({ "cron": cron }))
  }

  fn ids(triggers: &[StoredTrigger]) -> Vec<&str> {
    triggers.iter().map(|t| t.id.as_str()).collect()
  }

  #[test]
  fn test_identical_sets_are_unchanged() {
    let current = vec![timer("old-a", "a", "*/5 * * * *"), StoredTrigger::simple("old-b", "wf", "Start", "b")];
    let candidate = vec![timer("new-a", "a", "*/5 * * * *"), StoredTrigger::simple("new-b", "wf", "Start", "b")];

    let result = diff(current, candidate);

    assert!(result.is_empty());
    assert_eq!(ids(&result.unchanged), vec!["old-a", "old-b"]);
  }

  #[test]
  fn test_changed_payload_is_replaced() {
    let current = vec![timer("old", "a", "*/5 * * * *")];
    let candidate = vec![timer("new", "a", "0 * * * *")];

    let result = diff(current, candidate);

    assert_eq!(ids(&result.removed), vec!["old"]);
    assert_eq!(ids(&result.added), vec!["new"]);
    assert!(result.unchanged.is_empty());
  }

  #[test]
  fn test_empty_candidate_removes_everything() {
    let current = vec![timer("1", "a", "x"), timer("2", "b", "y")];
    let result = diff(current, Vec::new());

    assert_eq!(ids(&result.removed), vec!["1", "2"]);
    assert!(result.added.is_empty());
    assert!(result.unchanged.is_empty());
  }

  #[test]
  fn test_empty_current_adds_everything() {
    let candidate = vec![timer("1", "a", "x"), timer("2", "b", "y")];
    let result = diff(Vec::new(), candidate);

    assert_eq!(ids(&result.added), vec!["1", "2"]);
    assert!(result.removed.is_empty());
  }

  #[test]
  fn test_duplicates_collapse() {
    let current = vec![timer("c1", "a", "x"), timer("c2", "a", "x")];
    let candidate = vec![timer("n1", "a", "x"), timer("n2", "b", "y"), timer("n3", "b", "y")];

    let result = diff(current, candidate);

    assert_eq!(ids(&result.unchanged), vec!["c1"]);
    assert_eq!(ids(&result.removed), vec!["c2"]);
    assert_eq!(ids(&result.added), vec!["n2"]);
  }

  #[test]
  fn test_partition_is_total_and_disjoint() {
    let current = vec![
      timer("c1", "a", "1"),
      timer("c2", "b", "2"),
      StoredTrigger::simple("c3", "wf", "Start", "s"),
    ];
    let candidate = vec![
      timer("n1", "a", "1"),
      timer("n2", "b", "3"),
      StoredTrigger::simple("n3", "wf", "Start", "s"),
      timer("n4", "d", "4"),
    ];

    let all_keys: HashSet<TriggerKey> = current
      .iter()
      .chain(candidate.iter())
      .map(StoredTrigger::key)
      .collect();

    let result = diff(current, candidate);

    let added: HashSet<TriggerKey> = result.added.iter().map(StoredTrigger::key).collect();
    let removed: HashSet<TriggerKey> = result.removed.iter().map(StoredTrigger::key).collect();
    let unchanged: HashSet<TriggerKey> = result.unchanged.iter().map(StoredTrigger::key).collect();

    assert!(added.is_disjoint(&removed));
    assert!(added.is_disjoint(&unchanged));
    assert!(removed.is_disjoint(&unchanged));

    let covered: HashSet<TriggerKey> = added
      .union(&removed)
      .cloned()
      .collect::<HashSet<_>>()
      .union(&unchanged)
      .cloned()
      .collect();
    assert_eq!(covered, all_keys);
    assert_eq!(ids(&result.unchanged), vec!["c1", "c3"]);
  }
}
