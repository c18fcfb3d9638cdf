//! Composed game objects
//!
//! Objects are assembled from capability fragments by a [`Composer`]. The
//! fragments present decide which properties exist; grouping, opacity and
//! scale cooperate through the interception layer so writes on a parent
//! reach its children.

pub mod capability;
pub mod composer;
pub mod entity;
pub mod error;
pub mod fragment;
pub mod game_object;
pub mod group;
pub mod interception;
pub mod pipeline;
pub mod props;

#[cfg(test)]
mod tests;

pub use capability::Capabilities;
pub use composer::Composer;
pub use entity::{Bounded, GameEntity, Poolable};
pub use error::ObjectError;
pub use fragment::Fragment;
pub use game_object::{DrawFn, GameObject, ObjectId};
pub use group::ChildOptions;
pub use interception::{TrackedProperty, WriteObserver};
pub use props::{ObjectProps, PropValue};
