//! The composed game object
//!
//! A [`GameObject`] is a single concrete type with one optional slot per
//! capability. Fragments fill the slots they own when the object is
//! assembled; a slot left empty means the capability is absent, and every
//! accessor tied to it degrades to `None` or a no-op instead of failing.
//!
//! Writes to tracked properties (`x`, `y`, `rotation`, `sx`, `sy`, `scale`,
//! `opacity`) go through the interception layer so a group can propagate
//! them to its children.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::fragment::Fragment;
use super::interception::{TrackedProperty, WriteObserver};
use super::props::{ObjectProps, PropValue};
use super::{Capabilities, ObjectError};
use crate::foundation::math::{Point, Vector};
use crate::render::{Context, SharedContext};

/// Unique identity of a game object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
    fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric id
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Draw override captured at construction
pub type DrawFn = Rc<dyn Fn(&GameObject, &mut dyn Context)>;

/// Ordered fragment list shared by every object built from one composer
pub type FragmentList = Rc<[Rc<dyn Fragment>]>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Opacity {
    pub(crate) value: f32,
    pub(crate) final_value: f32,
}

impl Opacity {
    pub(crate) const fn opaque() -> Self {
        Self { value: 1.0, final_value: 1.0 }
    }
}

/// Non-owning link from a child to its group
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ParentLink {
    pub(crate) id: ObjectId,
    /// Parent's final opacity as of the last cascade; `None` if the parent
    /// has no opacity of its own
    pub(crate) final_opacity: Option<f32>,
}

/// A game entity assembled from capability fragments
pub struct GameObject {
    pub(crate) id: ObjectId,
    pub(crate) capabilities: Capabilities,
    pub(crate) fragments: FragmentList,

    pub(crate) position: Vector,
    pub(crate) width: f32,
    pub(crate) height: f32,
    pub(crate) velocity: Option<Vector>,
    pub(crate) acceleration: Option<Vector>,
    pub(crate) rotation: Option<f32>,
    pub(crate) scale: Option<Point>,
    pub(crate) anchor: Option<Point>,
    pub(crate) opacity: Option<Opacity>,
    pub(crate) camera: Option<Point>,
    pub(crate) ttl: Option<f32>,

    pub(crate) children: Option<Vec<GameObject>>,
    pub(crate) parent: Option<ParentLink>,

    pub(crate) context: Option<SharedContext>,
    pub(crate) draw_fn: Option<DrawFn>,
    pub(crate) props: BTreeMap<String, PropValue>,
    pub(crate) observers: Vec<Box<dyn WriteObserver>>,
}

impl fmt::Debug for GameObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameObject")
            .field("id", &self.id)
            .field("capabilities", &self.capabilities)
            .field("x", &self.position.x())
            .field("y", &self.position.y())
            .field("children", &self.children.as_ref().map(Vec::len))
            .field("parent", &self.parent.map(|link| link.id))
            .finish_non_exhaustive()
    }
}

impl GameObject {
    /// Empty shell with no fragment installed yet
    pub(crate) fn bare(fragments: FragmentList) -> Self {
        Self {
            id: ObjectId::next(),
            capabilities: Capabilities::empty(),
            fragments,
            position: Vector::zero(),
            width: 0.0,
            height: 0.0,
            velocity: None,
            acceleration: None,
            rotation: None,
            scale: None,
            anchor: None,
            opacity: None,
            camera: None,
            ttl: None,
            children: None,
            parent: None,
            context: None,
            draw_fn: None,
            props: BTreeMap::new(),
            observers: Vec::new(),
        }
    }

    /// Run every fragment in order: switch on its capabilities, then let it
    /// initialize its state.
    pub(crate) fn install_fragments(&mut self) {
        let fragments = Rc::clone(&self.fragments);
        for fragment in fragments.iter() {
            self.capabilities |= fragment.capabilities();
            fragment.install(self);
            log::trace!("Installed fragment '{}' on {}", fragment.name(), self.id);
        }
    }

    /// Reset the object to freshly built state and apply `props`.
    ///
    /// Identity and registered observers survive; children are dropped.
    pub fn init(&mut self, props: ObjectProps) {
        let mut fresh = Self::bare(Rc::clone(&self.fragments));
        fresh.id = self.id;
        fresh.observers = std::mem::take(&mut self.observers);
        *self = fresh;

        self.install_fragments();
        self.apply_props(props);
    }

    /// Object identity
    pub const fn id(&self) -> ObjectId {
        self.id
    }

    /// Active capability set
    pub const fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Feature test: are all of `capabilities` installed?
    pub const fn has(&self, capabilities: Capabilities) -> bool {
        self.capabilities.contains(capabilities)
    }

    pub(crate) const fn missing(capability: Capabilities, operation: &'static str) -> ObjectError {
        ObjectError::MissingCapability { capability, operation }
    }

    // --- rect -------------------------------------------------------------

    /// X position
    pub const fn x(&self) -> f32 {
        self.position.x()
    }

    /// Y position
    pub const fn y(&self) -> f32 {
        self.position.y()
    }

    /// Write x; groups fan the change out to their children
    pub fn set_x(&mut self, x: f32) {
        let old = self.position.x();
        self.position.set_x(x);
        self.intercept(TrackedProperty::X, old, self.position.x());
    }

    /// Write y; groups fan the change out to their children
    pub fn set_y(&mut self, y: f32) {
        let old = self.position.y();
        self.position.set_y(y);
        self.intercept(TrackedProperty::Y, old, self.position.y());
    }

    /// Position vector
    pub const fn position(&self) -> Vector {
        self.position
    }

    /// Replace the position vector wholesale
    pub fn set_position(&mut self, position: Vector) {
        let old = self.position;
        self.position = position;
        self.intercept(TrackedProperty::X, old.x(), position.x());
        self.intercept(TrackedProperty::Y, old.y(), position.y());
    }

    /// Clamp future position writes to the given bounds
    pub fn clamp_position(&mut self, x_min: f32, y_min: f32, x_max: f32, y_max: f32) {
        self.position.clamp(x_min, y_min, x_max, y_max);
    }

    /// Unscaled width
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Unscaled height
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Set unscaled width
    pub fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    /// Set unscaled height
    pub fn set_height(&mut self, height: f32) {
        self.height = height;
    }

    // --- velocity / acceleration -----------------------------------------

    /// Velocity vector
    pub const fn velocity(&self) -> Option<Vector> {
        self.velocity
    }

    /// Mutable velocity, e.g. to clamp it
    pub fn velocity_mut(&mut self) -> Option<&mut Vector> {
        self.velocity.as_mut()
    }

    /// Replace the velocity vector
    pub fn set_velocity(&mut self, velocity: Vector) {
        if let Some(slot) = self.velocity.as_mut() {
            *slot = velocity;
        }
    }

    /// Horizontal velocity
    pub fn dx(&self) -> Option<f32> {
        self.velocity.map(|v| v.x())
    }

    /// Vertical velocity
    pub fn dy(&self) -> Option<f32> {
        self.velocity.map(|v| v.y())
    }

    /// Write horizontal velocity
    pub fn set_dx(&mut self, dx: f32) {
        if let Some(velocity) = self.velocity.as_mut() {
            velocity.set_x(dx);
        }
    }

    /// Write vertical velocity
    pub fn set_dy(&mut self, dy: f32) {
        if let Some(velocity) = self.velocity.as_mut() {
            velocity.set_y(dy);
        }
    }

    /// Acceleration vector
    pub const fn acceleration(&self) -> Option<Vector> {
        self.acceleration
    }

    /// Mutable acceleration, e.g. to clamp it
    pub fn acceleration_mut(&mut self) -> Option<&mut Vector> {
        self.acceleration.as_mut()
    }

    /// Horizontal acceleration
    pub fn ddx(&self) -> Option<f32> {
        self.acceleration.map(|v| v.x())
    }

    /// Vertical acceleration
    pub fn ddy(&self) -> Option<f32> {
        self.acceleration.map(|v| v.y())
    }

    /// Write horizontal acceleration
    pub fn set_ddx(&mut self, ddx: f32) {
        if let Some(acceleration) = self.acceleration.as_mut() {
            acceleration.set_x(ddx);
        }
    }

    /// Write vertical acceleration
    pub fn set_ddy(&mut self, ddy: f32) {
        if let Some(acceleration) = self.acceleration.as_mut() {
            acceleration.set_y(ddy);
        }
    }

    // --- rotation / scale / anchor ----------------------------------------

    /// Rotation in radians
    pub const fn rotation(&self) -> Option<f32> {
        self.rotation
    }

    /// Write rotation; groups fan the change out to their children
    pub fn set_rotation(&mut self, rotation: f32) {
        let Some(old) = self.rotation else {
            return;
        };
        self.rotation = Some(rotation);
        self.intercept(TrackedProperty::Rotation, old, rotation);
    }

    /// Scale factors
    pub const fn scale(&self) -> Option<Point> {
        self.scale
    }

    /// Set the scale.
    ///
    /// Children of a group receive the same change as a delta added to
    /// their own scale.
    pub fn set_scale(&mut self, x: f32, y: f32) -> Result<(), ObjectError> {
        if self.scale.is_none() {
            return Err(Self::missing(Capabilities::SCALE, "set_scale"));
        }
        self.apply_scale(Point::new(x, y));
        Ok(())
    }

    /// Store a new scale and propagate it; no-op without the scale capability
    pub(crate) fn apply_scale(&mut self, new: Point) {
        let Some(slot) = self.scale.as_mut() else {
            return;
        };
        let old = std::mem::replace(slot, new);

        self.fan_out_scale(old, new);
        self.notify(TrackedProperty::ScaleX, old.x, new.x);
        self.notify(TrackedProperty::ScaleY, old.y, new.y);
    }

    /// Set both scale factors to `factor`
    pub fn set_uniform_scale(&mut self, factor: f32) -> Result<(), ObjectError> {
        self.set_scale(factor, factor)
    }

    /// Width after scaling (read-only)
    pub fn scaled_width(&self) -> Option<f32> {
        self.scale.map(|scale| self.width * scale.x)
    }

    /// Height after scaling (read-only)
    pub fn scaled_height(&self) -> Option<f32> {
        self.scale.map(|scale| self.height * scale.y)
    }

    /// Anchor as a fraction of width/height
    pub const fn anchor(&self) -> Option<Point> {
        self.anchor
    }

    /// Set the anchor
    pub fn set_anchor(&mut self, anchor: Point) {
        if let Some(slot) = self.anchor.as_mut() {
            *slot = anchor;
        }
    }

    // --- opacity ----------------------------------------------------------

    /// Own opacity
    pub fn opacity(&self) -> Option<f32> {
        self.opacity.map(|opacity| opacity.value)
    }

    /// Effective opacity: own opacity times the parent's final opacity
    /// (read-only)
    pub fn final_opacity(&self) -> Option<f32> {
        self.opacity.map(|opacity| opacity.final_value)
    }

    /// Write opacity and recompute the final opacity of the whole subtree
    pub fn set_opacity(&mut self, opacity: f32) {
        let Some(slot) = self.opacity.as_mut() else {
            return;
        };
        let old = slot.value;
        slot.value = opacity;

        self.refresh_opacity();
        self.notify(TrackedProperty::Opacity, old, opacity);
    }

    // --- camera -----------------------------------------------------------

    /// Horizontal camera offset
    pub fn sx(&self) -> Option<f32> {
        self.camera.map(|camera| camera.x)
    }

    /// Vertical camera offset
    pub fn sy(&self) -> Option<f32> {
        self.camera.map(|camera| camera.y)
    }

    /// Write horizontal camera offset; groups fan it out
    pub fn set_sx(&mut self, sx: f32) {
        let Some(camera) = self.camera.as_mut() else {
            return;
        };
        let old = camera.x;
        camera.x = sx;
        self.intercept(TrackedProperty::Sx, old, sx);
    }

    /// Write vertical camera offset; groups fan it out
    pub fn set_sy(&mut self, sy: f32) {
        let Some(camera) = self.camera.as_mut() else {
            return;
        };
        let old = camera.y;
        camera.y = sy;
        self.intercept(TrackedProperty::Sy, old, sy);
    }

    /// Camera-adjusted x (read-only)
    pub fn view_x(&self) -> Option<f32> {
        self.camera.map(|camera| self.x() - camera.x)
    }

    /// Camera-adjusted y (read-only)
    pub fn view_y(&self) -> Option<f32> {
        self.camera.map(|camera| self.y() - camera.y)
    }

    // --- lifetime ---------------------------------------------------------

    /// Remaining time-to-live
    pub const fn ttl(&self) -> Option<f32> {
        self.ttl
    }

    /// Set time-to-live
    pub fn set_ttl(&mut self, ttl: f32) {
        if let Some(slot) = self.ttl.as_mut() {
            *slot = ttl;
        }
    }

    /// Alive while `ttl > 0`; objects without a lifetime never expire
    pub fn is_alive(&self) -> bool {
        self.ttl.map_or(true, |ttl| ttl > 0.0)
    }

    // --- render hooks -----------------------------------------------------

    /// Drawing backend used by [`render`](Self::render)
    pub const fn context(&self) -> Option<&SharedContext> {
        self.context.as_ref()
    }

    /// Replace the drawing backend
    pub fn set_context(&mut self, context: SharedContext) {
        self.context = Some(context);
    }

    /// Replace [`draw`](Self::draw) with a custom function
    pub fn set_draw_fn(&mut self, draw: impl Fn(&Self, &mut dyn Context) + 'static) {
        self.draw_fn = Some(Rc::new(draw));
    }

    // --- update -----------------------------------------------------------

    /// Per-frame update: advance, then update children in insertion order
    pub fn update(&mut self, dt: f32) {
        if self.has(Capabilities::UPDATE) {
            self.advance(dt);
        }
        if let Some(children) = self.children.as_mut() {
            for child in children {
                child.update(dt);
            }
        }
    }

    /// Integrate acceleration into velocity and velocity into position,
    /// then count down the time-to-live.
    ///
    /// Velocity and position are replaced with new vectors rather than
    /// mutated in place.
    pub fn advance(&mut self, dt: f32) {
        if !self.has(Capabilities::UPDATE) {
            return;
        }

        if let (Some(velocity), Some(acceleration)) = (self.velocity, self.acceleration) {
            self.velocity = Some(velocity.add(&acceleration, dt));
        }
        if let Some(velocity) = self.velocity {
            let next = self.position.add(&velocity, dt);
            self.set_position(next);
        }
        if let Some(ttl) = self.ttl.as_mut() {
            *ttl -= 1.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Composer;

    fn build(capabilities: Capabilities) -> GameObject {
        Composer::new(capabilities).build(ObjectProps::default())
    }

    #[test]
    fn test_ids_are_unique() {
        let a = build(Capabilities::RECT);
        let b = build(Capabilities::RECT);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_defaults_per_fragment() {
        let object = build(Capabilities::all());

        assert_eq!(object.x(), 0.0);
        assert_eq!(object.width(), 0.0);
        assert_eq!(object.dx(), Some(0.0));
        assert_eq!(object.ddy(), Some(0.0));
        assert_eq!(object.rotation(), Some(0.0));
        assert_eq!(object.scale(), Some(Point::splat(1.0)));
        assert_eq!(object.anchor(), Some(Point::new(0.0, 0.0)));
        assert_eq!(object.opacity(), Some(1.0));
        assert_eq!(object.final_opacity(), Some(1.0));
        assert_eq!(object.sx(), Some(0.0));
        assert_eq!(object.ttl(), Some(f32::INFINITY));
        assert!(object.is_alive());
    }

    #[test]
    fn test_absent_capabilities_read_as_none() {
        let mut object = build(Capabilities::RECT);

        assert_eq!(object.rotation(), None);
        assert_eq!(object.dx(), None);
        assert_eq!(object.final_opacity(), None);
        assert_eq!(object.view_x(), None);
        assert_eq!(object.scaled_width(), None);

        object.set_rotation(1.0);
        object.set_opacity(0.5);
        object.set_dx(3.0);
        assert_eq!(object.rotation(), None);
        assert_eq!(object.opacity(), None);
        assert_eq!(object.dx(), None);
        assert_eq!(
            object.set_scale(2.0, 2.0),
            Err(ObjectError::MissingCapability { capability: Capabilities::SCALE, operation: "set_scale" })
        );
    }

    #[test]
    fn test_advance_integrates_acceleration_then_velocity() {
        let mut object = build(Capabilities::PHYSICS | Capabilities::LIFETIME);
        object.set_dx(1.0);
        object.set_ddx(2.0);
        object.set_ttl(2.0);

        object.advance(0.5);

        assert_eq!(object.dx(), Some(2.0));
        assert_eq!(object.x(), 1.0);
        assert_eq!(object.ttl(), Some(1.0));
        assert!(object.is_alive());

        object.update(0.5);
        assert_eq!(object.x(), 2.5);
        assert_eq!(object.ttl(), Some(0.0));
        assert!(!object.is_alive());
    }

    #[test]
    fn test_advance_keeps_clamp_on_position() {
        let mut object = build(Capabilities::PHYSICS);
        object.clamp_position(0.0, 0.0, 10.0, 10.0);
        object.set_dx(100.0);

        object.advance(1.0);

        assert_eq!(object.x(), 10.0);
    }

    #[test]
    fn test_update_without_update_fragment_is_noop() {
        let mut object = build(Capabilities::VELOCITY | Capabilities::LIFETIME);
        object.set_dx(5.0);
        object.set_ttl(1.0);

        object.update(1.0);

        assert_eq!(object.x(), 0.0);
        assert_eq!(object.ttl(), Some(1.0));
    }

    #[test]
    fn test_ttl_boundary() {
        let mut object = build(Capabilities::LIFETIME);

        object.set_ttl(0.5);
        assert!(object.is_alive());
        object.set_ttl(0.0);
        assert!(!object.is_alive());
        object.set_ttl(-1.0);
        assert!(!object.is_alive());
    }

    #[test]
    fn test_scaled_dimensions() {
        let mut object = build(Capabilities::SCALE);
        object.set_width(10.0);
        object.set_height(4.0);

        object.set_scale(2.0, 0.5).unwrap();

        assert_eq!(object.scaled_width(), Some(20.0));
        assert_eq!(object.scaled_height(), Some(2.0));
        object.set_uniform_scale(3.0).unwrap();
        assert_eq!(object.scale(), Some(Point::splat(3.0)));
    }

    #[test]
    fn test_view_position_subtracts_camera() {
        let mut object = build(Capabilities::CAMERA);
        object.set_x(100.0);
        object.set_y(50.0);
        object.set_sx(30.0);
        object.set_sy(-10.0);

        assert_eq!(object.view_x(), Some(70.0));
        assert_eq!(object.view_y(), Some(60.0));
    }

    #[test]
    fn test_init_resets_state_but_keeps_identity() {
        let mut object = build(Capabilities::all());
        let id = object.id();
        object.set_x(99.0);
        object.set_rotation(2.0);
        object.add_child(build(Capabilities::RECT)).unwrap();

        object.init(ObjectProps::new().with_position(1.0, 2.0));

        assert_eq!(object.id(), id);
        assert_eq!(object.x(), 1.0);
        assert_eq!(object.y(), 2.0);
        assert_eq!(object.rotation(), Some(0.0));
        assert!(object.children().is_empty());
    }
}
