//! Scene
//!
//! Owns the top-level objects of a screen and drives them as a unit. Objects
//! are addressed by stable [`SceneKey`]s and updated and rendered in the
//! order they were added.

use crate::core::config::SceneConfig;
use crate::foundation::collections::{SceneKey, SceneMap};
use crate::foundation::math::Point;
use crate::object::GameObject;
use crate::render::Context;

/// Collection of top-level objects sharing one camera
#[derive(Debug)]
pub struct Scene {
    config: SceneConfig,
    objects: SceneMap<GameObject>,
    order: Vec<SceneKey>,
    camera: Point,
}

impl Scene {
    /// Create an empty scene of the configured view size
    pub fn new(config: SceneConfig) -> Self {
        Self {
            config,
            objects: SceneMap::with_key(),
            order: Vec::new(),
            camera: Point::default(),
        }
    }

    /// View size and other settings
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Add an object; it adopts the scene's current camera offset if it has
    /// the camera capability
    pub fn add(&mut self, mut object: GameObject) -> SceneKey {
        object.set_sx(self.camera.x);
        object.set_sy(self.camera.y);

        let id = object.id();
        let key = self.objects.insert(object);
        self.order.push(key);
        log::debug!("Scene added {} ({} objects)", id, self.order.len());
        key
    }

    /// Take an object out of the scene
    pub fn remove(&mut self, key: SceneKey) -> Option<GameObject> {
        let object = self.objects.remove(key)?;
        self.order.retain(|k| *k != key);
        Some(object)
    }

    /// Look up an object
    pub fn get(&self, key: SceneKey) -> Option<&GameObject> {
        self.objects.get(key)
    }

    /// Look up an object mutably
    pub fn get_mut(&mut self, key: SceneKey) -> Option<&mut GameObject> {
        self.objects.get_mut(key)
    }

    /// Objects in insertion order
    pub fn objects(&self) -> impl Iterator<Item = &GameObject> + '_ {
        self.order.iter().filter_map(|key| self.objects.get(*key))
    }

    /// Number of top-level objects
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the scene has no objects
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Update every object in insertion order
    pub fn update(&mut self, dt: f32) {
        for key in &self.order {
            if let Some(object) = self.objects.get_mut(*key) {
                object.update(dt);
            }
        }
    }

    /// Drop objects whose time-to-live has run out, returning how many
    pub fn remove_dead(&mut self) -> usize {
        let dead: Vec<SceneKey> = self
            .order
            .iter()
            .copied()
            .filter(|key| self.objects.get(*key).is_some_and(|object| !object.is_alive()))
            .collect();
        for key in &dead {
            self.remove(*key);
        }
        dead.len()
    }

    /// Render every object through its own drawing backend
    pub fn render(&self) {
        for object in self.objects() {
            object.render();
        }
    }

    /// Render every object against an explicit backend
    pub fn render_to(&self, context: &mut dyn Context) {
        for object in self.objects() {
            object.render_to(context);
        }
    }

    /// Current camera offset
    pub fn camera(&self) -> Point {
        self.camera
    }

    /// Center the view on `(x, y)`.
    ///
    /// Writes the camera offset to every camera-capable object; groups pass
    /// the change on to their children.
    pub fn look_at(&mut self, x: f32, y: f32) {
        self.camera = Point::new(x - self.config.width / 2.0, y - self.config.height / 2.0);
        for object in self.objects.values_mut() {
            object.set_sx(self.camera.x);
            object.set_sy(self.camera.y);
        }
        log::debug!("Scene camera moved to ({}, {})", self.camera.x, self.camera.y);
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}
