//! Grouping: children, parent links and fan-out
//!
//! A group owns its children in insertion order, which is also their update
//! and render order. Children store absolute coordinates: attaching a child
//! reparents its coordinates once, and every later change to the parent's
//! position, rotation, camera offset or scale is pushed to the children as a
//! delta. Grandchildren receive the delta through their own parent's
//! fan-out, never directly from the grandparent.

use super::game_object::ParentLink;
use super::interception::TrackedProperty;
use super::{Capabilities, GameObject, ObjectError, ObjectId};
use crate::foundation::math::Point;

/// Options for [`GameObject::add_child_with`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChildOptions {
    /// Keep the child's coordinates as they are instead of offsetting them
    /// by the parent's
    pub absolute: bool,
}

impl ChildOptions {
    /// Attach without reparenting coordinates
    pub const fn absolute() -> Self {
        Self { absolute: true }
    }
}

impl GameObject {
    /// Children in insertion order; empty without the group capability
    pub fn children(&self) -> &[GameObject] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Mutable access to the children
    pub fn children_mut(&mut self) -> &mut [GameObject] {
        self.children.as_deref_mut().unwrap_or_default()
    }

    /// Find a direct child
    pub fn child(&self, id: ObjectId) -> Option<&GameObject> {
        self.children().iter().find(|child| child.id == id)
    }

    /// Find a direct child mutably
    pub fn child_mut(&mut self, id: ObjectId) -> Option<&mut GameObject> {
        self.children_mut().iter_mut().find(|child| child.id == id)
    }

    /// Id of the group this object is attached to
    pub fn parent_id(&self) -> Option<ObjectId> {
        self.parent.map(|link| link.id)
    }

    /// Attach `child`, offsetting its coordinates by this object's
    pub fn add_child(&mut self, child: GameObject) -> Result<ObjectId, ObjectError> {
        self.add_child_with(child, ChildOptions::default())
    }

    /// Attach `child`.
    ///
    /// Unless `options.absolute` is set, the child's `x`/`y` (and `rotation`,
    /// `sx`/`sy` and scale where both sides have them) are rewritten by
    /// adding this object's current values. Scale is combined as a delta
    /// from identity. The child's final opacity is seeded from this object.
    pub fn add_child_with(
        &mut self,
        child: GameObject,
        options: ChildOptions,
    ) -> Result<ObjectId, ObjectError> {
        if self.children.is_none() {
            return Err(Self::missing(Capabilities::GROUP, "add_child"));
        }
        Ok(self.attach(child, options))
    }

    /// Reparent and push `child`; callers check for the group capability
    pub(crate) fn attach(&mut self, mut child: GameObject, options: ChildOptions) -> ObjectId {
        if !options.absolute {
            child.set_x(child.x() + self.x());
            child.set_y(child.y() + self.y());
            if let (Some(rotation), Some(own)) = (self.rotation, child.rotation) {
                child.set_rotation(own + rotation);
            }
            if let (Some(camera), Some(own)) = (self.camera, child.camera) {
                child.set_sx(own.x + camera.x);
                child.set_sy(own.y + camera.y);
            }
            if let (Some(scale), Some(own)) = (self.scale, child.scale) {
                child.apply_scale(Point::new(own.x + scale.x - 1.0, own.y + scale.y - 1.0));
            }
        }

        child.parent = Some(ParentLink {
            id: self.id,
            final_opacity: self.final_opacity(),
        });
        child.refresh_opacity();

        let id = child.id;
        log::debug!("Attached {} to group {} (absolute: {})", id, self.id, options.absolute);
        if let Some(children) = self.children.as_mut() {
            children.push(child);
        }
        id
    }

    /// Detach a child and hand it back.
    ///
    /// The child keeps its absolute coordinates; its final opacity falls
    /// back to its own opacity.
    pub fn remove_child(&mut self, id: ObjectId) -> Result<GameObject, ObjectError> {
        let Some(children) = self.children.as_mut() else {
            return Err(Self::missing(Capabilities::GROUP, "remove_child"));
        };
        let index = children
            .iter()
            .position(|child| child.id == id)
            .ok_or(ObjectError::ChildNotFound(id))?;

        let mut child = children.remove(index);
        child.parent = None;
        child.refresh_opacity();
        log::debug!("Detached {} from group {}", id, self.id);
        Ok(child)
    }

    /// Add `delta` to the same property of every child that has it
    pub(crate) fn fan_out(&mut self, property: TrackedProperty, delta: f32) {
        if delta == 0.0 {
            return;
        }
        let Some(children) = self.children.as_mut() else {
            return;
        };
        log::trace!("Fanning out {} {:+} to {} children", property.name(), delta, children.len());

        for child in children {
            match property {
                TrackedProperty::X => child.set_x(child.x() + delta),
                TrackedProperty::Y => child.set_y(child.y() + delta),
                TrackedProperty::Rotation => {
                    if let Some(rotation) = child.rotation {
                        child.set_rotation(rotation + delta);
                    }
                }
                TrackedProperty::Sx => {
                    if let Some(sx) = child.sx() {
                        child.set_sx(sx + delta);
                    }
                }
                TrackedProperty::Sy => {
                    if let Some(sy) = child.sy() {
                        child.set_sy(sy + delta);
                    }
                }
                TrackedProperty::ScaleX | TrackedProperty::ScaleY | TrackedProperty::Opacity => {}
            }
        }
    }

    /// Push a scale change to children as `child.scale + (new - old)`
    pub(crate) fn fan_out_scale(&mut self, old: Point, new: Point) {
        let Some(children) = self.children.as_mut() else {
            return;
        };
        if old == new {
            return;
        }

        for child in children {
            if let Some(own) = child.scale {
                child.apply_scale(Point::new(own.x + new.x - old.x, own.y + new.y - old.y));
            }
        }
    }

    /// Recompute final opacity from own opacity and the parent link, then
    /// cascade to every child with its own opacity unchanged.
    pub(crate) fn refresh_opacity(&mut self) {
        let parent_final = self.parent.and_then(|link| link.final_opacity);
        let final_opacity = self.opacity.as_mut().map(|opacity| {
            opacity.final_value = parent_final.map_or(opacity.value, |parent| parent * opacity.value);
            opacity.final_value
        });

        if let Some(children) = self.children.as_mut() {
            for child in children {
                if let Some(link) = child.parent.as_mut() {
                    link.final_opacity = final_opacity;
                }
                child.refresh_opacity();
            }
        }
    }
}
