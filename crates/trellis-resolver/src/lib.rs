mod error;
mod registry;
mod resolver;

pub use error::ResolveError;
pub use registry::{ActivityDescriptor, ActivityKind, ActivityRegistry, TriggerFactory};
pub use resolver::{Resolver, StandardResolver};
