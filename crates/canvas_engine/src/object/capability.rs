//! Capability flags
//!
//! Each flag corresponds to one fragment. The set chosen for a
//! [`Composer`](super::Composer) decides which fragments are installed on
//! the objects it builds; everything else is simply absent.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Set of fragments active on an object
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Capabilities: u32 {
        /// Position and size; always installed
        const RECT = 1 << 0;
        /// `velocity`, `dx`/`dy`
        const VELOCITY = 1 << 1;
        /// `acceleration`, `ddx`/`ddy`
        const ACCELERATION = 1 << 2;
        /// `rotation` in radians
        const ROTATION = 1 << 3;
        /// `scale`, `set_scale`, scaled dimensions
        const SCALE = 1 << 4;
        /// `anchor`
        const ANCHOR = 1 << 5;
        /// `opacity`, `final_opacity`
        const OPACITY = 1 << 6;
        /// Camera offset `sx`/`sy` and view position
        const CAMERA = 1 << 7;
        /// `ttl` and a meaningful `is_alive`
        const LIFETIME = 1 << 8;
        /// Children, parent link and fan-out of transform writes
        const GROUP = 1 << 9;
        /// The render transform pipeline
        const RENDER = 1 << 10;
        /// `update`/`advance` integration
        const UPDATE = 1 << 11;

        /// Everything that positions or orients the object
        const TRANSFORM = Self::ROTATION.bits() | Self::SCALE.bits() | Self::ANCHOR.bits();
        /// Motion integration
        const PHYSICS = Self::VELOCITY.bits() | Self::ACCELERATION.bits() | Self::UPDATE.bits();
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_every_fragment() {
        let caps = Capabilities::default();
        assert!(caps.contains(Capabilities::GROUP | Capabilities::RENDER | Capabilities::LIFETIME));
    }

    #[test]
    fn test_serializes_as_flag_names() {
        let caps = Capabilities::RECT | Capabilities::GROUP;

        let text = ron::to_string(&caps).unwrap();
        assert!(text.contains("RECT"));
        assert!(text.contains("GROUP"));

        let back: Capabilities = ron::from_str(&text).unwrap();
        assert_eq!(back, caps);
    }
}
