use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use trellis_expression::BoundInput;
use trellis_trigger::Trigger;
use trellis_trigger::builtin::{
  CronTrigger, EventTrigger, HttpEndpointTrigger, StartAtTrigger, TimerTrigger,
};

/// Builds a trigger from its bound inputs.
pub type TriggerFactory = Arc<dyn Fn(Vec<BoundInput>) -> Arc<dyn Trigger> + Send + Sync>;

/// How activities of a registered type are built.
#[derive(Clone)]
pub enum ActivityKind {
  /// Leaf activity without trigger capability.
  Simple,
  /// Leaf activity with trigger capability.
  Trigger(TriggerFactory),
  /// Holds child activities and connections.
  Container,
}

impl fmt::Debug for ActivityKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Simple => f.write_str("Simple"),
      Self::Trigger(_) => f.write_str("Trigger(..)"),
      Self::Container => f.write_str("Container"),
    }
  }
}

/// A registered activity type.
#[derive(Debug, Clone)]
pub struct ActivityDescriptor {
  pub type_name: String,
  pub kind: ActivityKind,
  /// Default for activities that don't set `can_start_workflow` themselves.
  pub can_start_workflow: bool,
}

/// Activity types known to the resolver, keyed by type name.
#[derive(Debug, Clone, Default)]
pub struct ActivityRegistry {
  descriptors: HashMap<String, ActivityDescriptor>,
}

impl ActivityRegistry {
  /// An empty registry.
  pub fn new() -> Self {
    Self::default()
  }

  /// A registry with the built-in activity types.
  pub fn with_builtins() -> Self {
    let mut registry = Self::new();
    registry.register_container("Flowchart");
    registry.register_container("Sequence");
    registry.register_simple("Start", true);
    registry.register_simple("Log", false);
    registry.register_simple("End", false);
    registry.register_trigger(TimerTrigger::TYPE_NAME, |inputs| -> Arc<dyn Trigger> {
      Arc::new(TimerTrigger::new(inputs))
    });
    registry.register_trigger(CronTrigger::TYPE_NAME, |inputs| -> Arc<dyn Trigger> {
      Arc::new(CronTrigger::new(inputs))
    });
    registry.register_trigger(EventTrigger::TYPE_NAME, |inputs| -> Arc<dyn Trigger> {
      Arc::new(EventTrigger::new(inputs))
    });
    registry.register_trigger(HttpEndpointTrigger::TYPE_NAME, |inputs| -> Arc<dyn Trigger> {
      Arc::new(HttpEndpointTrigger::new(inputs))
    });
    registry.register_trigger(StartAtTrigger::TYPE_NAME, |inputs| -> Arc<dyn Trigger> {
      Arc::new(StartAtTrigger::new(inputs))
    });
    registry
  }

  pub fn register_simple(&mut self, type_name: impl Into<String>, can_start_workflow: bool) {
    self.register(type_name.into(), ActivityKind::Simple, can_start_workflow);
  }

  /// Register a trigger type. Trigger activities can start workflows by default.
  pub fn register_trigger<F>(&mut self, type_name: impl Into<String>, factory: F)
  where
    F: Fn(Vec<BoundInput>) -> Arc<dyn Trigger> + Send + Sync + 'static,
  {
    self.register(type_name.into(), ActivityKind::Trigger(Arc::new(factory)), true);
  }

  pub fn register_container(&mut self, type_name: impl Into<String>) {
    self.register(type_name.into(), ActivityKind::Container, false);
  }

  fn register(&mut self, type_name: String, kind: ActivityKind, can_start_workflow: bool) {
    self.descriptors.insert(
      type_name.clone(),
      ActivityDescriptor {
        type_name,
        kind,
        can_start_workflow,
      },
    );
  }

  pub fn get(&self, type_name: &str) -> Option<&ActivityDescriptor> {
    self.descriptors.get(type_name)
  }
}
