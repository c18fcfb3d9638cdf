//! Object pool
//!
//! Recycles entities instead of allocating new ones per spawn. The backing
//! store keeps live objects in front of dead ones: `objects[..size]` are in
//! play, everything after is available for reuse.

use thiserror::Error;

use crate::core::config::PoolConfig;
use crate::object::{Capabilities, Poolable};

/// Errors raised when setting up a pool
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// The factory yields objects the pool cannot drive
    #[error("pooled objects need the {capability:?} capability")]
    MissingCapability {
        /// First capability found missing
        capability: Capabilities,
    },

    /// `max_size` must allow at least one object
    #[error("pool max size must be at least 1")]
    InvalidMaxSize,
}

/// Fixed-ceiling pool of recyclable entities
pub struct Pool<T: Poolable> {
    create: Box<dyn FnMut() -> T>,
    objects: Vec<T>,
    size: usize,
    max_size: usize,
}

impl<T: Poolable> std::fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pool")
            .field("size", &self.size)
            .field("capacity", &self.objects.len())
            .field("max_size", &self.max_size)
            .finish_non_exhaustive()
    }
}

impl<T: Poolable> Pool<T> {
    /// Create a pool around `create`.
    ///
    /// One object is created immediately and validated, so a factory that
    /// produces unusable objects fails here rather than on first use.
    pub fn new(mut create: impl FnMut() -> T + 'static, max_size: usize) -> Result<Self, PoolError> {
        if max_size == 0 {
            return Err(PoolError::InvalidMaxSize);
        }

        let first = create();
        first.validate()?;

        Ok(Self {
            create: Box::new(create),
            objects: vec![first],
            size: 0,
            max_size,
        })
    }

    /// Create a pool bounded by `config.max_size`
    pub fn with_config(create: impl FnMut() -> T + 'static, config: &PoolConfig) -> Result<Self, PoolError> {
        Self::new(create, config.max_size)
    }

    /// Take an object out of the pool and initialize it with `props`.
    ///
    /// The backing store doubles when every object is in use, up to
    /// `max_size`. Returns `None` once the pool is full.
    pub fn get(&mut self, props: T::Props) -> Option<&mut T> {
        if self.size == self.objects.len() {
            if self.size >= self.max_size {
                log::trace!("Pool full at {} objects", self.max_size);
                return None;
            }
            let target = (self.objects.len() * 2).min(self.max_size);
            let additional = target - self.objects.len();
            self.objects.reserve(additional);
            for _ in 0..additional {
                self.objects.push((self.create)());
            }
            log::debug!("Pool grew to {} objects", self.objects.len());
        }

        let object = &mut self.objects[self.size];
        self.size += 1;
        object.init(props);
        Some(object)
    }

    /// Update every live object, then move dead ones behind the live region.
    ///
    /// Live objects keep their relative order.
    pub fn update(&mut self, dt: f32) {
        for object in &mut self.objects[..self.size] {
            object.update(dt);
        }

        let live = &mut self.objects[..self.size];
        live.sort_by_key(|object| !object.is_alive());
        let alive = live.iter().take_while(|object| object.is_alive()).count();
        if alive < self.size {
            log::trace!("Pool released {} objects", self.size - alive);
        }
        self.size = alive;
    }

    /// Render every live object
    pub fn render(&self) {
        for object in self.alive() {
            object.render();
        }
    }

    /// Live objects, in the order they were taken
    pub fn alive(&self) -> &[T] {
        &self.objects[..self.size]
    }

    /// Live objects, mutably
    pub fn alive_mut(&mut self) -> &mut [T] {
        &mut self.objects[..self.size]
    }

    /// Release every object and shrink back to a single pooled object
    pub fn clear(&mut self) {
        self.size = 0;
        self.objects.truncate(1);
        if self.objects.is_empty() {
            self.objects.push((self.create)());
        }
    }

    /// Number of live objects
    pub fn size(&self) -> usize {
        self.size
    }

    /// Objects currently allocated, live or not
    pub fn capacity(&self) -> usize {
        self.objects.len()
    }

    /// Ceiling on allocated objects
    pub fn max_size(&self) -> usize {
        self.max_size
    }
}
