//! Spatial partitioning data structures
//!
//! Provides broad-phase spatial indexing for collision and proximity
//! queries in 2D space.

mod quadtree;

pub use quadtree::{Quadtree, QuadtreeEntry, QuadtreeNode};
pub use crate::core::config::QuadtreeConfig;
