//! Screen-space geometry for the play field.
//!
//! All coordinates are in screen units with the origin at the top-left corner
//! and `y` growing downward. Velocities are expressed in units per tick; the
//! engine runs on a fixed logical tick so no delta time is involved.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in screen space.
///
/// `min` is the top-left corner, `size` the extent along each axis.
///
/// # Overlap
///
/// [`Rect::intersects`] is strict: rectangles that merely share an edge do not
/// overlap, and a rectangle with zero area never overlaps anything.
///
/// # Example
///
/// ```
/// use twinfire_core::geometry::Rect;
///
/// let a = Rect::new(0.0, 0.0, 10.0, 10.0);
/// let b = Rect::new(5.0, 5.0, 10.0, 10.0);
/// let c = Rect::new(10.0, 0.0, 10.0, 10.0);
///
/// assert!(a.intersects(&b));
/// assert!(!a.intersects(&c)); // shared edge only
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and dimensions.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Creates a rectangle of the given size centered on `center`.
    #[must_use]
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size * 0.5,
            size,
        }
    }

    /// Bottom-right corner.
    #[must_use]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Geometric center.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Left edge.
    #[must_use]
    pub const fn left(&self) -> f32 {
        self.min.x
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    /// Top edge.
    #[must_use]
    pub const fn top(&self) -> f32 {
        self.min.y
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    /// Returns `true` if the rectangle has no area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Returns `true` if the two rectangles share a region of positive area.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x
            && other.min.x < a_max.x
            && self.min.y < b_max.y
            && other.min.y < a_max.y
    }

    /// Returns a copy moved by `delta`.
    #[must_use]
    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            min: self.min + delta,
            size: self.size,
        }
    }
}

/// Kinematic body shared by every on-screen entity.
///
/// `position` is the top-left corner of the entity's image, `size` its image
/// size. The body's [`Rect`] is what the overlap detector sees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner of the image
    pub position: Vec2,
    /// Image size
    pub size: Vec2,
    /// Displacement applied on every tick the body moves
    #[serde(default)]
    pub velocity: Vec2,
}

impl Body {
    /// Creates a stationary body.
    #[must_use]
    pub const fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            size,
            velocity: Vec2::ZERO,
        }
    }

    /// Creates a body with an initial velocity.
    #[must_use]
    pub const fn moving(position: Vec2, size: Vec2, velocity: Vec2) -> Self {
        Self {
            position,
            size,
            velocity,
        }
    }

    /// Creates a body of the given size centered on `center`.
    #[must_use]
    pub fn centered(center: Vec2, size: Vec2, velocity: Vec2) -> Self {
        Self::moving(center - size * 0.5, size, velocity)
    }

    /// The body's current screen rectangle.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect {
            min: self.position,
            size: self.size,
        }
    }

    /// Center of the body's rectangle.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    /// Moves the body by its velocity for one tick.
    pub fn advance(&mut self) {
        self.position += self.velocity;
    }
}

/// Dimensions of the play field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Field {
    /// Width in screen units
    pub width: f32,
    /// Height in screen units
    pub height: f32,
}

impl Default for Field {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}

impl Field {
    /// The whole field as a rectangle.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Returns `true` once `rect` has left the field entirely.
    #[must_use]
    pub fn is_outside(&self, rect: &Rect) -> bool {
        rect.bottom() <= 0.0
            || rect.top() >= self.height
            || rect.right() <= 0.0
            || rect.left() >= self.width
    }

    /// Clamps a body so its rectangle stays inside the field.
    pub fn clamp(&self, body: &mut Body) {
        let max = Vec2::new(self.width, self.height) - body.size;
        body.position = body.position.clamp(Vec2::ZERO, max.max(Vec2::ZERO));
    }
}
