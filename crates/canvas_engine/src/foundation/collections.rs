//! Specialized collection types

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable handle to an object owned by a [`Scene`](crate::scene::Scene)
    pub struct SceneKey;
}

/// Handle-based map keyed by [`SceneKey`]
pub type SceneMap<T> = SlotMap<SceneKey, T>;
