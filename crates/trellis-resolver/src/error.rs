use thiserror::Error;

/// Errors that can occur during workflow resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
  /// Activity type is not registered.
  #[error("unknown activity type '{type_name}' for activity '{activity_id}'")]
  UnknownActivityType {
    activity_id: String,
    type_name: String,
  },

  /// Duplicate activity ID.
  #[error("duplicate activity id: {activity_id}")]
  DuplicateActivityId { activity_id: String },

  /// Invalid connection reference (activity doesn't exist in the flowchart).
  #[error("invalid connection in '{container_id}': activity '{activity_id}' does not exist")]
  InvalidConnection {
    container_id: String,
    activity_id: String,
  },

  /// Child activities declared on an activity that is not a container.
  #[error("activity '{activity_id}' of type '{type_name}' cannot contain other activities")]
  NotAContainer {
    activity_id: String,
    type_name: String,
  },
}
