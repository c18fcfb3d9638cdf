//! # Engine Configuration
//!
//! Settings the application chooses once at startup: logging, frame rate,
//! the capability set objects are composed from, and the sizing of the
//! pool, quadtree and scene collaborators.
//!
//! Every structure is serializable, so the whole configuration can live in
//! a RON or TOML file loaded through [`Config`].

use serde::{Deserialize, Serialize};

use crate::foundation::time::{frame_delta, DEFAULT_FRAME_RATE};
use crate::object::Capabilities;

pub use crate::config::{Config, ConfigError};

/// # Pool Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Ceiling on objects a pool will allocate
    pub max_size: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self { max_size: 1024 }
    }
}

/// # Quadtree Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadtreeConfig {
    /// Deepest level a node may split to
    pub max_depth: u32,
    /// Entries a leaf holds before splitting
    pub max_objects: usize,
}

impl Default for QuadtreeConfig {
    fn default() -> Self {
        Self { max_depth: 3, max_objects: 25 }
    }
}

/// # Scene Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// View width, used to center the camera
    pub width: f32,
    /// View height, used to center the camera
    pub height: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self { width: 800.0, height: 600.0 }
    }
}

/// # Engine Configuration
///
/// Top-level configuration applications load at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log filter, in `env_logger` syntax
    pub log_level: String,
    /// Fixed update rate
    pub frame_rate: f32,
    /// Fragments objects are composed from
    pub capabilities: Capabilities,
    /// Object pool sizing
    pub pool: PoolConfig,
    /// Quadtree sizing
    pub quadtree: QuadtreeConfig,
    /// Scene view size
    pub scene: SceneConfig,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            frame_rate: DEFAULT_FRAME_RATE,
            capabilities: Capabilities::all(),
            pool: PoolConfig::default(),
            quadtree: QuadtreeConfig::default(),
            scene: SceneConfig::default(),
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set frame rate
    pub fn with_frame_rate(mut self, frame_rate: f32) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    /// Set the capability set
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Set pool sizing
    pub fn with_pool(mut self, pool: PoolConfig) -> Self {
        self.pool = pool;
        self
    }

    /// Set quadtree sizing
    pub fn with_quadtree(mut self, quadtree: QuadtreeConfig) -> Self {
        self.quadtree = quadtree;
        self
    }

    /// Set scene view size
    pub fn with_scene(mut self, scene: SceneConfig) -> Self {
        self.scene = scene;
        self
    }

    /// Fixed delta per update
    pub fn frame_delta(&self) -> f32 {
        frame_delta(self.frame_rate)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.frame_rate.is_finite() && self.frame_rate > 0.0) {
            return Err(ConfigError::Invalid(format!("frame rate must be positive, got {}", self.frame_rate)));
        }
        if self.pool.max_size == 0 {
            return Err(ConfigError::Invalid("pool max_size must be at least 1".to_string()));
        }
        if self.quadtree.max_objects == 0 {
            return Err(ConfigError::Invalid("quadtree max_objects must be at least 1".to_string()));
        }
        if self.scene.width <= 0.0 || self.scene.height <= 0.0 {
            return Err(ConfigError::Invalid("scene size must be positive".to_string()));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for EngineConfig {}
