use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::activity::Activity;

/// Identity of one version of a workflow definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkflowIdentity {
  pub definition_id: String,
  pub version: u32,
}

/// Publication state of a workflow version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Publication {
  pub is_published: bool,
}

/// A resolved workflow ready for trigger indexing.
#[derive(Debug, Clone)]
pub struct Workflow {
  pub identity: WorkflowIdentity,
  pub name: String,
  pub publication: Publication,
  pub root: Arc<Activity>,
}

impl Workflow {
  pub fn new(
    definition_id: impl Into<String>,
    version: u32,
    name: impl Into<String>,
    is_published: bool,
    root: Activity,
  ) -> Self {
    Self {
      identity: WorkflowIdentity {
        definition_id: definition_id.into(),
        version,
      },
      name: name.into(),
      publication: Publication { is_published },
      root: Arc::new(root),
    }
  }

  pub fn definition_id(&self) -> &str {
    &self.identity.definition_id
  }

  pub fn is_published(&self) -> bool {
    self.publication.is_published
  }
}
