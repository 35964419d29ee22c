//! Payload extraction for start activities.

use std::sync::Arc;

use tracing::{debug, warn};
use trellis_expression::{EvaluationError, ExpressionEvaluator};
use trellis_trigger::{IdGenerator, StoredTrigger, Trigger};
use trellis_workflow::{Activity, ActivityNode};

use crate::config::IndexerConfig;
use crate::context::IndexingContext;
use crate::error::IndexingError;

/// Turns start activities into stored trigger candidates.
///
/// Input evaluation failures, timeouts and payload retrieval failures are
/// logged and contained: the affected trigger just yields fewer (possibly no)
/// stored triggers. Only cancellation is returned as an error.
pub struct PayloadExtractor {
  evaluator: Arc<dyn ExpressionEvaluator>,
  id_generator: Arc<dyn IdGenerator>,
  config: IndexerConfig,
}

impl PayloadExtractor {
  pub fn new(
    evaluator: Arc<dyn ExpressionEvaluator>,
    id_generator: Arc<dyn IdGenerator>,
    config: IndexerConfig,
  ) -> Self {
    Self {
      evaluator,
      id_generator,
      config,
    }
  }

  pub(crate) fn set_evaluator(&mut self, evaluator: Arc<dyn ExpressionEvaluator>) {
    self.evaluator = evaluator;
  }

  pub(crate) fn set_id_generator(&mut self, id_generator: Arc<dyn IdGenerator>) {
    self.id_generator = id_generator;
  }

  /// Build the stored trigger candidates for one start activity.
  pub async fn extract(
    &self,
    ctx: &mut IndexingContext<'_>,
    node: &ActivityNode,
  ) -> Result<Vec<StoredTrigger>, IndexingError> {
    let activity = node.activity.as_ref();
    let definition_id = ctx.workflow().definition_id().to_string();

    let Some(trigger) = activity.as_trigger() else {
      return Ok(vec![StoredTrigger::simple(
        self.id_generator.generate_id(),
        definition_id,
        &activity.type_name,
        &activity.activity_id,
      )]);
    };

    let payloads = self.trigger_payloads(ctx, activity, trigger).await?;

    Ok(
      payloads
        .iter()
        .map(|payload| {
          StoredTrigger::with_payload(
            self.id_generator.generate_id(),
            definition_id.clone(),
            &activity.type_name,
            &activity.activity_id,
            payload,
          )
        })
        .collect(),
    )
  }

  async fn trigger_payloads(
    &self,
    ctx: &mut IndexingContext<'_>,
    activity: &Activity,
    trigger: &dyn Trigger,
  ) -> Result<Vec<serde_json::Value>, IndexingError> {
    let cancel = ctx.cancellation_token().clone();
    let entry = ctx.register_for(activity);

    if !entry.evaluated {
      for input in trigger.bound_inputs() {
        if cancel.is_cancelled() {
          return Err(IndexingError::Cancelled);
        }

        let evaluation = tokio::time::timeout(
          self.config.evaluation_timeout,
          self.evaluator.evaluate(&input.expression, &entry.scope),
        );

        let result = tokio::select! {
          biased;
          _ = cancel.cancelled() => return Err(IndexingError::Cancelled),
          result = evaluation => result.unwrap_or_else(|_| {
            Err(EvaluationError::Timeout {
              expression: input.expression.to_string(),
              timeout_ms: u64::try_from(self.config.evaluation_timeout.as_millis())
                .unwrap_or(u64::MAX),
            })
          }),
        };

        match result {
          Ok(value) => entry.scope.set_input(&input.target, value),
          Err(e) => warn!(
            activity_id = %activity.activity_id,
            input = %input.target,
            error = %e,
            "input_evaluation_failed"
          ),
        }
      }
      entry.evaluated = true;
    }

    let mut payloads = match trigger.payloads(&entry.scope) {
      Ok(payloads) => payloads,
      Err(e) => {
        warn!(
          activity_id = %activity.activity_id,
          trigger_type = %activity.type_name,
          error = %e,
          "trigger_payloads_failed"
        );
        return Ok(Vec::new());
      }
    };

    if payloads.len() > self.config.max_payloads_per_trigger {
      warn!(
        activity_id = %activity.activity_id,
        count = payloads.len(),
        max = self.config.max_payloads_per_trigger,
        "trigger_payloads_truncated"
      );
      payloads.truncate(self.config.max_payloads_per_trigger);
    }

    debug!(
      activity_id = %activity.activity_id,
      inputs = entry.scope.register().len(),
      count = payloads.len(),
      "trigger_payloads_extracted"
    );
    Ok(payloads)
  }
}
