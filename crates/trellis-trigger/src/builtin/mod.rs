//! Trigger activities that ship with Trellis.
//!
//! | type           | inputs                    | payload                          |
//! |----------------|---------------------------|----------------------------------|
//! | `Timer`        | `interval` (seconds)      | `{ "interval_seconds": n }`      |
//! | `Cron`         | `cron_expression`         | `{ "cron": "..." }`              |
//! | `Event`        | `event_name`              | `{ "event_name": "..." }`        |
//! | `HttpEndpoint` | `path`, `methods`         | `{ "path": "...", "method": m }` per method |
//! | `StartAt`      | `date_time` (RFC 3339)    | `{ "execute_at": "..." }`        |

mod cron;
mod event;
mod http_endpoint;
mod start_at;
mod timer;

pub use cron::CronTrigger;
pub use event::EventTrigger;
pub use http_endpoint::HttpEndpointTrigger;
pub use start_at::StartAtTrigger;
pub use timer::TimerTrigger;

use trellis_expression::EvaluationScope;

use crate::TriggerError;

/// Read a required, non-blank string input.
fn required_str<'a>(scope: &'a EvaluationScope, input: &str) -> Result<&'a str, TriggerError> {
  match scope.input(input) {
    None => Err(TriggerError::missing(input)),
    Some(_) => scope
      .input_str(input)
      .map(str::trim)
      .ok_or_else(|| TriggerError::invalid(input, "expected a non-empty string")),
  }
}
