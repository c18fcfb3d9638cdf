//! Object-level errors

use super::{Capabilities, ObjectId};
use thiserror::Error;

/// Errors raised by capability-bound object operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ObjectError {
    /// The operation belongs to a fragment the object was built without
    #[error("`{operation}` needs the {capability:?} capability")]
    MissingCapability {
        /// Capability the operation depends on
        capability: Capabilities,
        /// Operation that was attempted
        operation: &'static str,
    },

    /// No child with this id is attached
    #[error("object {0} is not a child of this group")]
    ChildNotFound(ObjectId),
}
