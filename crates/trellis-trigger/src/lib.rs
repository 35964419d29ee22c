//! Trigger types for Trellis workflows.
//!
//! - [`Trigger`]: the capability an activity exposes when it can start a
//!   workflow on an external condition. It declares bound inputs and turns an
//!   evaluated scope into opaque payload descriptors.
//! - [`StoredTrigger`]: the persisted record of one (workflow, activity,
//!   payload hash) combination.
//! - [`hash_payload`] and [`diff`]: content addressing and set reconciliation
//!   of stored triggers.
//! - [`builtin`]: the trigger activities that ship with Trellis.

pub mod builtin;
mod diff;
mod hash;
mod id;
mod stored;
mod types;

pub use diff::{TriggerDiff, diff};
pub use hash::{canonical_json, canonicalize, hash_payload};
pub use id::{IdGenerator, UuidGenerator};
pub use stored::{StoredTrigger, TriggerKey};
pub use types::{Trigger, TriggerError};
