//! Uniform entity contract
//!
//! Containers (pool, quadtree, scene) are written against these traits
//! rather than against [`GameObject`] directly, so they work with any type
//! that offers the same minimal surface.

use super::{Capabilities, GameObject, ObjectId, ObjectProps};
use crate::foundation::math::Rect;
use crate::foundation::time::DEFAULT_FRAME_DELTA;
use crate::pool::PoolError;
use crate::render::Context;

/// Minimal surface every entity exposes regardless of its capabilities
pub trait GameEntity {
    /// X position
    fn x(&self) -> f32;

    /// Y position
    fn y(&self) -> f32;

    /// Write x
    fn set_x(&mut self, x: f32);

    /// Write y
    fn set_y(&mut self, y: f32);

    /// Per-frame update with an explicit time delta
    fn update(&mut self, dt: f32);

    /// Per-frame update at the default 60 Hz delta
    fn tick(&mut self) {
        self.update(DEFAULT_FRAME_DELTA);
    }

    /// Render through the entity's own drawing backend
    fn render(&self);

    /// Entity-local drawing
    fn draw(&self, context: &mut dyn Context);

    /// Whether the entity should stay in play
    fn is_alive(&self) -> bool;
}

/// Entity occupying an axis-aligned area
pub trait Bounded {
    /// Identity reported back by spatial queries
    fn object_id(&self) -> ObjectId;

    /// World-space bounds
    fn world_rect(&self) -> Rect;
}

/// Entity a [`Pool`](crate::pool::Pool) can recycle
pub trait Poolable: GameEntity {
    /// Properties handed to [`init`](Self::init)
    type Props: Default;

    /// Reset to a freshly built state and apply `props`
    fn init(&mut self, props: Self::Props);

    /// Check that this entity supports everything a pool relies on
    fn validate(&self) -> Result<(), PoolError> {
        Ok(())
    }
}

impl GameEntity for GameObject {
    fn x(&self) -> f32 {
        GameObject::x(self)
    }

    fn y(&self) -> f32 {
        GameObject::y(self)
    }

    fn set_x(&mut self, x: f32) {
        GameObject::set_x(self, x);
    }

    fn set_y(&mut self, y: f32) {
        GameObject::set_y(self, y);
    }

    fn update(&mut self, dt: f32) {
        GameObject::update(self, dt);
    }

    fn render(&self) {
        GameObject::render(self);
    }

    fn draw(&self, context: &mut dyn Context) {
        GameObject::draw(self, context);
    }

    fn is_alive(&self) -> bool {
        GameObject::is_alive(self)
    }
}

impl Bounded for GameObject {
    fn object_id(&self) -> ObjectId {
        self.id()
    }

    /// Scaled size, shifted so the anchor point sits at `(x, y)`.
    ///
    /// A negative scale mirrors the drawn area about the anchor; the rect
    /// covers the mirrored area and its size is never negative.
    fn world_rect(&self) -> Rect {
        let width = self.scaled_width().unwrap_or(self.width());
        let height = self.scaled_height().unwrap_or(self.height());
        let anchor = self.anchor().unwrap_or_default();

        let left = self.x() - width * anchor.x;
        let top = self.y() - height * anchor.y;
        Rect::new(left.min(left + width), top.min(top + height), width.abs(), height.abs())
    }
}

impl Poolable for GameObject {
    type Props = ObjectProps;

    fn init(&mut self, props: ObjectProps) {
        GameObject::init(self, props);
    }

    /// A pooled object must update, render and expire
    fn validate(&self) -> Result<(), PoolError> {
        for capability in [Capabilities::UPDATE, Capabilities::RENDER, Capabilities::LIFETIME] {
            if !self.has(capability) {
                return Err(PoolError::MissingCapability { capability });
            }
        }
        Ok(())
    }
}
