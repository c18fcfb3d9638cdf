//! Entity composer
//!
//! A [`Composer`] turns a capability set into an ordered fragment list once,
//! then stamps out objects from it. Building an object runs every fragment
//! in order (built-ins first, caller-supplied extras last), then assigns
//! the construction properties.

use std::rc::Rc;

use super::fragment::{
    AccelerationFragment, AnchorFragment, CameraFragment, Fragment, GroupFragment,
    LifetimeFragment, OpacityFragment, RectFragment, RenderFragment, RotationFragment,
    ScaleFragment, UpdateFragment, VelocityFragment,
};
use super::game_object::FragmentList;
use super::{Capabilities, GameObject, ObjectProps};
use crate::core::config::EngineConfig;
use crate::render::SharedContext;

/// Factory for objects sharing one capability set
pub struct Composer {
    capabilities: Capabilities,
    context: Option<SharedContext>,
    extras: Vec<Rc<dyn Fragment>>,
    fragments: FragmentList,
}

impl std::fmt::Debug for Composer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.fragments.iter().map(|fragment| fragment.name()).collect();
        f.debug_struct("Composer")
            .field("capabilities", &self.capabilities)
            .field("fragments", &names)
            .finish()
    }
}

impl Composer {
    /// Composer installing the built-in fragments selected by `capabilities`.
    ///
    /// The rect fragment is always included.
    pub fn new(capabilities: Capabilities) -> Self {
        let mut composer = Self {
            capabilities: capabilities | Capabilities::RECT,
            context: None,
            extras: Vec::new(),
            fragments: Rc::from(Vec::new()),
        };
        composer.rebuild();
        composer
    }

    /// Composer for the capability set named in the engine configuration
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.capabilities)
    }

    /// Builder pattern: Drawing backend seeded by the render fragment
    pub fn with_context(mut self, context: SharedContext) -> Self {
        self.context = Some(context);
        self.rebuild();
        self
    }

    /// Builder pattern: Append a custom fragment, installed after every
    /// built-in one
    pub fn with_fragment(mut self, fragment: impl Fragment + 'static) -> Self {
        self.extras.push(Rc::new(fragment));
        self.rebuild();
        self
    }

    /// Requested capability set
    pub const fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Names of the installed fragments, in install order
    pub fn fragment_names(&self) -> Vec<&str> {
        self.fragments.iter().map(|fragment| fragment.name()).collect()
    }

    /// Assemble a new object and assign `props`
    pub fn build(&self, props: ObjectProps) -> GameObject {
        let mut object = GameObject::bare(Rc::clone(&self.fragments));
        object.install_fragments();
        object.apply_props(props);

        log::debug!(
            "Built {} with {:?} ({} fragments)",
            object.id(),
            object.capabilities(),
            self.fragments.len()
        );
        object
    }

    /// Object with default properties
    pub fn build_default(&self) -> GameObject {
        self.build(ObjectProps::default())
    }

    fn rebuild(&mut self) {
        let caps = self.capabilities;
        let mut fragments: Vec<Rc<dyn Fragment>> = Vec::new();

        fragments.push(Rc::new(RectFragment));
        if caps.contains(Capabilities::VELOCITY) {
            fragments.push(Rc::new(VelocityFragment));
        }
        if caps.contains(Capabilities::ACCELERATION) {
            fragments.push(Rc::new(AccelerationFragment));
        }
        if caps.contains(Capabilities::ROTATION) {
            fragments.push(Rc::new(RotationFragment));
        }
        if caps.contains(Capabilities::SCALE) {
            fragments.push(Rc::new(ScaleFragment));
        }
        if caps.contains(Capabilities::ANCHOR) {
            fragments.push(Rc::new(AnchorFragment));
        }
        if caps.contains(Capabilities::OPACITY) {
            fragments.push(Rc::new(OpacityFragment));
        }
        if caps.contains(Capabilities::CAMERA) {
            fragments.push(Rc::new(CameraFragment));
        }
        if caps.contains(Capabilities::LIFETIME) {
            fragments.push(Rc::new(LifetimeFragment));
        }
        // Group fans out writes to the properties above
        if caps.contains(Capabilities::GROUP) {
            fragments.push(Rc::new(GroupFragment));
        }
        if caps.contains(Capabilities::RENDER) {
            let render = match &self.context {
                Some(context) => RenderFragment::with_context(Rc::clone(context)),
                None => RenderFragment::default(),
            };
            fragments.push(Rc::new(render));
        }
        if caps.contains(Capabilities::UPDATE) {
            fragments.push(Rc::new(UpdateFragment));
        }

        fragments.extend(self.extras.iter().cloned());
        self.fragments = Rc::from(fragments);
    }
}

impl Default for Composer {
    fn default() -> Self {
        Self::new(Capabilities::default())
    }
}
