//! Content hashing of trigger payloads.
//!
//! Payloads are reduced to canonical JSON (object keys sorted at every depth)
//! before hashing, so two payloads that differ only in key insertion order
//! produce the same digest. The digest is lowercase hex SHA-256 and is only
//! ever compared for equality.

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Rebuild a JSON value with object keys sorted at every depth.
pub fn canonicalize(value: &Value) -> Value {
  match value {
    Value::Object(map) => {
      let mut keys: Vec<&String> = map.keys().collect();
      keys.sort();
      let mut sorted = Map::with_capacity(map.len());
      for key in keys {
        sorted.insert(key.clone(), canonicalize(&map[key]));
      }
      Value::Object(sorted)
    }
    Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
    other => other.clone(),
  }
}

/// Serialize a value to its canonical JSON string.
pub fn canonical_json(value: &Value) -> String {
  canonicalize(value).to_string()
}

/// Compute the dedup/change-detection hash for a trigger payload.
///
/// The trigger type name is part of the digest, so identical payloads of
/// different trigger types never collide.
pub fn hash_payload(type_name: &str, payload: &Value) -> String {
  let input = Value::Array(vec![
    Value::String(type_name.to_string()),
    canonicalize(payload),
  ]);
  let hash = Sha256::digest(input.to_string().as_bytes());
  format!("{hash:x}")
}
