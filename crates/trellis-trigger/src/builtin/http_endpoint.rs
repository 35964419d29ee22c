use serde_json::{Value, json};
use trellis_expression::{BoundInput, EvaluationScope};

use super::required_str;
use crate::{Trigger, TriggerError};

/// Starts the workflow when an HTTP request hits a path.
///
/// Produces one payload per accepted method, so listeners can route on
/// `(path, method)` directly.
#[derive(Debug, Clone)]
pub struct HttpEndpointTrigger {
  inputs: Vec<BoundInput>,
}

impl HttpEndpointTrigger {
  pub const TYPE_NAME: &'static str = "HttpEndpoint";
  pub const PATH: &'static str = "path";
  pub const METHODS: &'static str = "methods";

  pub fn new(inputs: Vec<BoundInput>) -> Self {
    Self { inputs }
  }

  fn methods(scope: &EvaluationScope) -> Result<Vec<String>, TriggerError> {
    let raw: Vec<&str> = match scope.input(Self::METHODS) {
      None | Some(Value::Null) => vec!["get"],
      Some(Value::String(method)) => vec![method.as_str()],
      Some(Value::Array(items)) => items
        .iter()
        .map(|item| {
          item.as_str().ok_or_else(|| {
            TriggerError::invalid(Self::METHODS, format!("expected a string, got {}", item))
          })
        })
        .collect::<Result<_, _>>()?,
      Some(other) => {
        return Err(TriggerError::invalid(
          Self::METHODS,
          format!("expected a string or list of strings, got {}", other),
        ));
      }
    };

    let mut methods: Vec<String> = Vec::with_capacity(raw.len());
    for method in raw {
      let method = method.trim().to_lowercase();
      if !method.is_empty() && !methods.contains(&method) {
        methods.push(method);
      }
    }
    Ok(methods)
  }
}

impl Trigger for HttpEndpointTrigger {
  fn bound_inputs(&self) -> &[BoundInput] {
    &self.inputs
  }

  fn payloads(&self, scope: &EvaluationScope) -> Result<Vec<Value>, TriggerError> {
    let path = required_str(scope, Self::PATH)?;
    let path = if path.starts_with('/') {
      path.to_string()
    } else {
      format!("/{}", path)
    };

    Ok(
      Self::methods(scope)?
        .into_iter()
        .map(|method| json!({ "path": path, "method": method }))
        .collect(),
    )
  }
}
