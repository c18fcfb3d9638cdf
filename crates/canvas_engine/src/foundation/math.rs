//! Math utilities and types
//!
//! Provides the 2D vector that backs every positional capability, and the
//! small value types shared by the object model.

use serde::{Deserialize, Serialize};
use std::ops::{Mul, Sub};

pub use nalgebra::Vector2;

/// nalgebra 2D vector type
pub type Vec2 = Vector2<f32>;

/// Persistent clamp bounds attached to a [`Vector`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClampBounds {
    /// Smallest allowed x
    pub x_min: f32,
    /// Smallest allowed y
    pub y_min: f32,
    /// Largest allowed x
    pub x_max: f32,
    /// Largest allowed y
    pub y_max: f32,
}

impl ClampBounds {
    fn clamp_x(&self, x: f32) -> f32 {
        x.max(self.x_min).min(self.x_max)
    }

    fn clamp_y(&self, y: f32) -> f32 {
        y.max(self.y_min).min(self.y_max)
    }
}

/// 2D vector with optional persistent clamping
///
/// Once [`Vector::clamp`] has been called, every write to `x` or `y` is
/// clamped to the bounds before it is stored. Arithmetic never mutates the
/// operands: it returns a new vector carrying the clamp bounds of the left
/// operand, which are applied to the result.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    x: f32,
    y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bounds: Option<ClampBounds>,
}

impl Vector {
    /// Create an unclamped vector
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y, bounds: None }
    }

    /// The zero vector
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    fn with_bounds(x: f32, y: f32, bounds: Option<ClampBounds>) -> Self {
        let mut vector = Self { x: 0.0, y: 0.0, bounds };
        vector.set_x(x);
        vector.set_y(y);
        vector
    }

    /// X component
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Y component
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Write x, clamped if bounds are active
    pub fn set_x(&mut self, x: f32) {
        self.x = match &self.bounds {
            Some(bounds) => bounds.clamp_x(x),
            None => x,
        };
    }

    /// Write y, clamped if bounds are active
    pub fn set_y(&mut self, y: f32) {
        self.y = match &self.bounds {
            Some(bounds) => bounds.clamp_y(y),
            None => y,
        };
    }

    /// Install persistent clamp bounds.
    ///
    /// Only subsequent writes are clamped; the current value is left as is.
    pub fn clamp(&mut self, x_min: f32, y_min: f32, x_max: f32, y_max: f32) {
        self.bounds = Some(ClampBounds { x_min, y_min, x_max, y_max });
    }

    /// Active clamp bounds, if any
    pub const fn bounds(&self) -> Option<ClampBounds> {
        self.bounds
    }

    /// `self + other * dt` as a new vector
    ///
    /// Used for velocity/acceleration integration scaled by a frame delta.
    #[must_use]
    pub fn add(&self, other: &Self, dt: f32) -> Self {
        Self::with_bounds(self.x + other.x * dt, self.y + other.y * dt, self.bounds)
    }

    /// `self - other` as a new vector
    #[must_use]
    pub fn subtract(&self, other: &Self) -> Self {
        Self::with_bounds(self.x - other.x, self.y - other.y, self.bounds)
    }

    /// Multiply both components by `factor`
    #[must_use]
    pub fn scale(&self, factor: f32) -> Self {
        Self::with_bounds(self.x * factor, self.y * factor, self.bounds)
    }

    /// Euclidean length
    pub fn length(&self) -> f32 {
        self.to_vec2().norm()
    }

    /// Unit vector in the same direction.
    ///
    /// A zero-length vector has no direction: both components come back NaN.
    #[must_use]
    pub fn normalize(&self) -> Self {
        let length = self.length();
        Self::with_bounds(self.x / length, self.y / length, self.bounds)
    }

    /// Dot product
    pub fn dot(&self, other: &Self) -> f32 {
        self.to_vec2().dot(&other.to_vec2())
    }

    /// Distance between the two points
    pub fn distance(&self, other: &Self) -> f32 {
        (self.to_vec2() - other.to_vec2()).norm()
    }

    /// Convert to an nalgebra vector (bounds are dropped)
    pub fn to_vec2(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl From<Vec2> for Vector {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl std::ops::Add for Vector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::add(&self, &rhs, 1.0)
    }
}

impl Sub for Vector {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.subtract(&rhs)
    }
}

impl Mul<f32> for Vector {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        self.scale(rhs)
    }
}

/// Plain x/y pair used for scale, anchor and camera offsets
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
}

impl Point {
    /// Create a point
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Point with both components equal
    pub const fn splat(v: f32) -> Self {
        Self { x: v, y: v }
    }
}

/// Axis-aligned rectangle, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    /// Create a rectangle
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Check if the rectangle contains a point
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.width &&
        y >= self.y && y < self.y + self.height
    }

    /// Check if two rectangles overlap
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width && self.x + self.width > other.x &&
        self.y < other.y + other.height && self.y + self.height > other.y
    }
}
