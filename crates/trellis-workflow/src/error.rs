use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
  #[error("duplicate activity id: {0}")]
  DuplicateActivity(String),

  #[error("connection references unknown activity: from={from}, to={to}")]
  InvalidConnection { from: String, to: String },
}
