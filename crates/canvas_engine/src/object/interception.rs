//! Change interception
//!
//! Every setter of a tracked property reports the write here as
//! `(property, old, new)`. The grouping fragment reacts by propagating the
//! delta to children; other fragments stay unaware of grouping. Callers can
//! register extra [`WriteObserver`]s to watch the same stream.

use super::{GameObject, ObjectId};

/// Property whose writes are intercepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackedProperty {
    /// `x`
    X,
    /// `y`
    Y,
    /// Horizontal camera offset
    Sx,
    /// Vertical camera offset
    Sy,
    /// `rotation`
    Rotation,
    /// `scale.x`
    ScaleX,
    /// `scale.y`
    ScaleY,
    /// `opacity`
    Opacity,
}

impl TrackedProperty {
    /// Properties a group fans out by adding the same delta to each child.
    ///
    /// Scale and opacity have their own propagation rules.
    pub const fn propagates_delta(self) -> bool {
        matches!(self, Self::X | Self::Y | Self::Sx | Self::Sy | Self::Rotation)
    }

    /// Property name as used by the dynamic property bag
    pub const fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Sx => "sx",
            Self::Sy => "sy",
            Self::Rotation => "rotation",
            Self::ScaleX => "scale.x",
            Self::ScaleY => "scale.y",
            Self::Opacity => "opacity",
        }
    }
}

/// Callback notified of every intercepted write on one object
pub trait WriteObserver {
    /// Called after the write is stored and propagated to children
    fn on_write(&mut self, object: ObjectId, property: TrackedProperty, old: f32, new: f32);
}

impl<F> WriteObserver for F
where
    F: FnMut(ObjectId, TrackedProperty, f32, f32),
{
    fn on_write(&mut self, object: ObjectId, property: TrackedProperty, old: f32, new: f32) {
        self(object, property, old, new);
    }
}

impl GameObject {
    /// Register an observer for tracked writes on this object
    pub fn observe(&mut self, observer: impl WriteObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Handle a stored write of a delta-propagated property
    pub(crate) fn intercept(&mut self, property: TrackedProperty, old: f32, new: f32) {
        if property.propagates_delta() {
            self.fan_out(property, new - old);
        }
        self.notify(property, old, new);
    }

    pub(crate) fn notify(&mut self, property: TrackedProperty, old: f32, new: f32) {
        let id = self.id;
        for observer in &mut self.observers {
            observer.on_write(id, property, old, new);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{Capabilities, Composer, ObjectProps};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_observer_sees_tracked_writes() {
        let mut object = Composer::new(Capabilities::all()).build(ObjectProps::default());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        object.observe(move |_id: ObjectId, property: TrackedProperty, old: f32, new: f32| {
            sink.borrow_mut().push((property, old, new));
        });

        object.set_x(5.0);
        object.set_rotation(1.5);
        object.set_opacity(0.5);
        object.set_width(40.0);

        assert_eq!(
            *seen.borrow(),
            vec![
                (TrackedProperty::X, 0.0, 5.0),
                (TrackedProperty::Rotation, 0.0, 1.5),
                (TrackedProperty::Opacity, 1.0, 0.5),
            ]
        );
    }

    #[test]
    fn test_observer_fires_on_child_through_fan_out() {
        let mut parent = Composer::new(Capabilities::all()).build(ObjectProps::default());
        let mut child = Composer::new(Capabilities::all()).build(ObjectProps::default());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        child.observe(move |id: ObjectId, property: TrackedProperty, _old: f32, new: f32| {
            sink.borrow_mut().push((id, property, new));
        });
        let child_id = child.id();
        parent.add_child(child).unwrap();
        seen.borrow_mut().clear();

        parent.set_y(12.0);

        assert_eq!(*seen.borrow(), vec![(child_id, TrackedProperty::Y, 12.0)]);
    }

    #[test]
    fn test_only_positional_properties_propagate_deltas() {
        assert!(TrackedProperty::Sx.propagates_delta());
        assert!(!TrackedProperty::ScaleX.propagates_delta());
        assert!(!TrackedProperty::Opacity.propagates_delta());
        assert_eq!(TrackedProperty::Rotation.name(), "rotation");
    }
}
