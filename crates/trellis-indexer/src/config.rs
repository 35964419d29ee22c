use std::time::Duration;

/// Configuration for the trigger indexer.
#[derive(Debug, Clone)]
pub struct IndexerConfig {
  /// Payloads beyond this count from a single trigger are dropped with a warning.
  pub max_payloads_per_trigger: usize,
  /// Upper bound for evaluating one bound input.
  pub evaluation_timeout: Duration,
}

impl Default for IndexerConfig {
  fn default() -> Self {
    Self {
      max_payloads_per_trigger: 64,
      evaluation_timeout: Duration::from_secs(5),
    }
  }
}
