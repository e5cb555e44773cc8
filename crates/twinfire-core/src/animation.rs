//! Blast geometry supplied by the animation collaborator.
//!
//! A detonated missile stays a hazard while its explosion plays. The
//! collaborator owns frame selection; the engine only asks for the rectangle
//! of the current frame.

use glam::Vec2;

use crate::config::BlastConfig;
use crate::geometry::Rect;

/// Supplies the hazard rectangle of a missile blast.
pub trait BlastGeometry: Send + Sync {
    /// Rectangle of the blast centered on `center` at animation `frame`.
    ///
    /// `frame` counts from 1 on the first tick after detonation.
    fn blast_rect(&self, center: Vec2, frame: u32) -> Rect;
}

/// Square blast that grows by a fixed step each frame up to a cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpandingBlast {
    base_size: f32,
    growth: f32,
    max_size: f32,
}

impl ExpandingBlast {
    /// Creates a blast profile.
    #[must_use]
    pub const fn new(base_size: f32, growth: f32, max_size: f32) -> Self {
        Self {
            base_size,
            growth,
            max_size,
        }
    }

    /// Blast profile from configuration.
    #[must_use]
    pub const fn from_config(config: &BlastConfig) -> Self {
        Self::new(config.base_size, config.growth, config.max_size)
    }

    /// Side length at `frame`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn side(&self, frame: u32) -> f32 {
        let grown = self.base_size + self.growth * frame.saturating_sub(1) as f32;
        grown.min(self.max_size.max(self.base_size))
    }
}

impl Default for ExpandingBlast {
    fn default() -> Self {
        Self::from_config(&BlastConfig::default())
    }
}

impl BlastGeometry for ExpandingBlast {
    fn blast_rect(&self, center: Vec2, frame: u32) -> Rect {
        Rect::from_center(center, Vec2::splat(self.side(frame)))
    }
}
