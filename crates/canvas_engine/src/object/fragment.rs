//! Capability fragments
//!
//! A fragment is one independently defined slice of behavior: it declares
//! the capability it contributes and initializes the state that capability
//! needs on a freshly assembled object. Fragments own no objects and hold no
//! per-object state, so one fragment list is shared by every object a
//! [`Composer`](super::Composer) builds.
//!
//! Fragments are installed in order. A later fragment may overwrite anything
//! an earlier one initialized; the last write wins.

use super::game_object::Opacity;
use super::{Capabilities, GameObject};
use crate::foundation::math::{Point, Vector};
use crate::render::SharedContext;

/// One behavior unit mixed into a [`GameObject`]
pub trait Fragment {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Capabilities this fragment switches on
    fn capabilities(&self) -> Capabilities {
        Capabilities::empty()
    }

    /// Initialize the fragment's state on `object`.
    ///
    /// Runs once per construction (and again on pool re-initialization),
    /// immediately after the fragment's capabilities are switched on and
    /// before any later fragment is installed.
    fn install(&self, object: &mut GameObject);
}

/// Position and size
#[derive(Debug, Clone, Copy, Default)]
pub struct RectFragment;

impl Fragment for RectFragment {
    fn name(&self) -> &str {
        "rect"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::RECT
    }

    fn install(&self, object: &mut GameObject) {
        object.position = Vector::zero();
        object.width = 0.0;
        object.height = 0.0;
    }
}

/// Velocity vector
#[derive(Debug, Clone, Copy, Default)]
pub struct VelocityFragment;

impl Fragment for VelocityFragment {
    fn name(&self) -> &str {
        "velocity"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::VELOCITY
    }

    fn install(&self, object: &mut GameObject) {
        object.velocity = Some(Vector::zero());
    }
}

/// Acceleration vector
#[derive(Debug, Clone, Copy, Default)]
pub struct AccelerationFragment;

impl Fragment for AccelerationFragment {
    fn name(&self) -> &str {
        "acceleration"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::ACCELERATION
    }

    fn install(&self, object: &mut GameObject) {
        object.acceleration = Some(Vector::zero());
    }
}

/// Rotation in radians
#[derive(Debug, Clone, Copy, Default)]
pub struct RotationFragment;

impl Fragment for RotationFragment {
    fn name(&self) -> &str {
        "rotation"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::ROTATION
    }

    fn install(&self, object: &mut GameObject) {
        object.rotation = Some(0.0);
    }
}

/// Non-uniform scale
#[derive(Debug, Clone, Copy, Default)]
pub struct ScaleFragment;

impl Fragment for ScaleFragment {
    fn name(&self) -> &str {
        "scale"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::SCALE
    }

    fn install(&self, object: &mut GameObject) {
        object.scale = Some(Point::splat(1.0));
    }
}

/// Anchor, as a fraction of the object's size
#[derive(Debug, Clone, Copy, Default)]
pub struct AnchorFragment;

impl Fragment for AnchorFragment {
    fn name(&self) -> &str {
        "anchor"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::ANCHOR
    }

    fn install(&self, object: &mut GameObject) {
        object.anchor = Some(Point::default());
    }
}

/// Opacity and derived final opacity
#[derive(Debug, Clone, Copy, Default)]
pub struct OpacityFragment;

impl Fragment for OpacityFragment {
    fn name(&self) -> &str {
        "opacity"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::OPACITY
    }

    fn install(&self, object: &mut GameObject) {
        object.opacity = Some(Opacity::opaque());
    }
}

/// Camera offset
#[derive(Debug, Clone, Copy, Default)]
pub struct CameraFragment;

impl Fragment for CameraFragment {
    fn name(&self) -> &str {
        "camera"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::CAMERA
    }

    fn install(&self, object: &mut GameObject) {
        object.camera = Some(Point::default());
    }
}

/// Time-to-live, counted in advance calls
#[derive(Debug, Clone, Copy, Default)]
pub struct LifetimeFragment;

impl Fragment for LifetimeFragment {
    fn name(&self) -> &str {
        "lifetime"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::LIFETIME
    }

    fn install(&self, object: &mut GameObject) {
        object.ttl = Some(f32::INFINITY);
    }
}

/// Children and transform fan-out.
///
/// Must come after every fragment whose properties it fans out.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupFragment;

impl Fragment for GroupFragment {
    fn name(&self) -> &str {
        "group"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::GROUP
    }

    fn install(&self, object: &mut GameObject) {
        object.children = Some(Vec::new());
    }
}

/// Render pipeline; seeds the drawing backend
#[derive(Clone, Default)]
pub struct RenderFragment {
    context: Option<SharedContext>,
}

impl RenderFragment {
    /// Render fragment that hands `context` to every object it is installed on
    pub fn with_context(context: SharedContext) -> Self {
        Self { context: Some(context) }
    }
}

impl Fragment for RenderFragment {
    fn name(&self) -> &str {
        "render"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::RENDER
    }

    fn install(&self, object: &mut GameObject) {
        object.context = self.context.clone();
        object.draw_fn = None;
    }
}

/// Update/advance integration
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateFragment;

impl Fragment for UpdateFragment {
    fn name(&self) -> &str {
        "update"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::UPDATE
    }

    fn install(&self, _object: &mut GameObject) {}
}
