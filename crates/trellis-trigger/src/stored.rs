use std::hash::{Hash, Hasher};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::hash::{canonical_json, hash_payload};

/// A trigger record as persisted in the trigger store.
///
/// Equality and hashing use the semantic [`TriggerKey`] only. The `id` is
/// generated fresh on every indexing pass and never takes part in comparisons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredTrigger {
  pub id: String,
  pub workflow_definition_id: String,
  /// Trigger (activity) type name.
  pub name: String,
  pub activity_id: String,
  /// Payload digest; `None` for simple start activities.
  pub hash: Option<String>,
  /// Canonical JSON payload; `None` for simple start activities.
  pub data: Option<String>,
}

/// The diff identity of a stored trigger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriggerKey {
  pub workflow_definition_id: String,
  pub name: String,
  pub activity_id: String,
  pub hash: Option<String>,
}

impl StoredTrigger {
  /// A trigger record for a start activity without trigger data.
  pub fn simple(
    id: impl Into<String>,
    workflow_definition_id: impl Into<String>,
    name: impl Into<String>,
    activity_id: impl Into<String>,
  ) -> Self {
    Self {
      id: id.into(),
      workflow_definition_id: workflow_definition_id.into(),
      name: name.into(),
      activity_id: activity_id.into(),
      hash: None,
      data: None,
    }
  }

  /// A trigger record carrying a payload; hash and data are derived from it.
  pub fn with_payload(
    id: impl Into<String>,
    workflow_definition_id: impl Into<String>,
    name: impl Into<String>,
    activity_id: impl Into<String>,
    payload: &serde_json::Value,
  ) -> Self {
    let name = name.into();
    Self {
      id: id.into(),
      workflow_definition_id: workflow_definition_id.into(),
      hash: Some(hash_payload(&name, payload)),
      data: Some(canonical_json(payload)),
      name,
      activity_id: activity_id.into(),
    }
  }

  pub fn key(&self) -> TriggerKey {
    TriggerKey {
      workflow_definition_id: self.workflow_definition_id.clone(),
      name: self.name.clone(),
      activity_id: self.activity_id.clone(),
      hash: self.hash.clone(),
    }
  }

  /// Deserialize the stored payload, if there is one.
  pub fn payload<T: DeserializeOwned>(&self) -> Result<Option<T>, serde_json::Error> {
    self
      .data
      .as_deref()
      .map(|data| serde_json::from_str(data))
      .transpose()
  }

  fn key_parts(&self) -> (&str, &str, &str, Option<&str>) {
    (
      &self.workflow_definition_id,
      &self.name,
      &self.activity_id,
      self.hash.as_deref(),
    )
  }
}

impl PartialEq for StoredTrigger {
  fn eq(&self, other: &Self) -> bool {
    self.key_parts() == other.key_parts()
  }
}

impl Eq for StoredTrigger {}

impl Hash for StoredTrigger {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.key_parts().hash(state);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_equality_ignores_id() {
    let a = StoredTrigger::simple("id-1", "wf", "Start", "start");
    let b = StoredTrigger::simple("id-2", "wf", "Start", "start");
    assert_eq!(a, b);
    assert_eq!(a.key(), b.key());
  }

  #[test]
  fn test_equality_uses_hash() {
    let a = StoredTrigger::with_payload("1", "wf", "Timer", "a", &json!({ "cron": "*/5 * * * *" }));
    let b = StoredTrigger::with_payload("1", "wf", "Timer", "a", &json!({ "cron": "0 * * * *" }));
    assert_ne!(a, b);
  }

  #[test]
  fn test_payload_round_trips_through_data() {
    #[derive(Debug, PartialEq, Deserialize)]
    struct Cron {
      cron: String,
    }

    let trigger =
      StoredTrigger::with_payload("1", "wf", "Cron", "tick", &json!({ "cron": "0 * * * *" }));
    assert_eq!(trigger.data.as_deref(), Some(r#"{"cron":"0 * * * *"}"#));
    assert_eq!(
      trigger.payload::<Cron>().unwrap(),
      Some(Cron {
        cron: "0 * * * *".to_string()
      })
    );

    let simple = StoredTrigger::simple("2", "wf", "Start", "start");
    assert_eq!(simple.payload::<Cron>().unwrap(), None);
  }
}
