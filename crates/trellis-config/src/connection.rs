use serde::{Deserialize, Serialize};

/// A directed connection between two sibling activities of a flowchart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
  pub from: String,
  pub to: String,
}
