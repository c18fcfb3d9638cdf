//! # Canvas Engine
//!
//! Composable 2D game objects for immediate-mode canvas rendering.
//!
//! ## Features
//!
//! - **Capability Fragments**: position, motion, rotation, scale, anchor,
//!   opacity, camera, lifetime, grouping, rendering and update, each
//!   optional
//! - **Entity Composer**: one concrete object type assembled from the
//!   selected fragments, configured at build time
//! - **Grouping**: parent writes fan out to children as deltas; opacity
//!   multiplies down the tree
//! - **Render Pipeline**: fixed translate → rotate → scale → anchor →
//!   alpha → draw order against any drawing backend
//! - **Collaborators**: object pool, quadtree and scene built on the
//!   uniform entity contract
//!
//! ## Quick Start
//!
//! ```rust
//! use canvas_engine::prelude::*;
//!
//! let recorder = RecordingContext::shared();
//! let composer = Composer::new(Capabilities::all()).with_context(recorder.clone());
//!
//! let moon = composer.build(ObjectProps::new().with_position(20.0, 0.0));
//! let mut planet = composer.build(
//!     ObjectProps::new()
//!         .with_position(100.0, 100.0)
//!         .with_child(moon),
//! );
//!
//! planet.set_x(150.0);
//! assert_eq!(planet.children()[0].x(), 170.0);
//!
//! planet.render();
//! assert!(!recorder.borrow().calls().is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;
pub mod config;
pub mod foundation;

// Composition
pub mod object;
pub mod render;

// Collaborators
pub mod pool;
pub mod scene;
pub mod spatial;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        core::config::{EngineConfig, PoolConfig, QuadtreeConfig, SceneConfig},
        foundation::{
            collections::SceneKey,
            math::{Point, Rect, Vector},
            time::{FrameTimer, DEFAULT_FRAME_DELTA, DEFAULT_FRAME_RATE},
        },
        object::{
            Bounded, Capabilities, ChildOptions, Composer, Fragment, GameEntity, GameObject,
            ObjectError, ObjectId, ObjectProps, Poolable, PropValue, TrackedProperty, WriteObserver,
        },
        pool::{Pool, PoolError},
        render::{Context, DrawCall, ImageId, RecordingContext, SharedContext},
        scene::Scene,
        spatial::Quadtree,
    };
}
