/// Source of stored trigger identities.
pub trait IdGenerator: Send + Sync {
  /// Return a new globally unique identifier.
  fn generate_id(&self) -> String;
}

/// Random (v4) UUID identities.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
  fn generate_id(&self) -> String {
    uuid::Uuid::new_v4().to_string()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_ids_are_unique() {
    let generator = UuidGenerator;
    assert_ne!(generator.generate_id(), generator.generate_id());
  }
}
