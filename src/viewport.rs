//! Read-only viewport queries and pointer coordinate mapping.

use glam::Vec2;

/// Viewport dimensions in physical pixels.
///
/// Pure queries against the host surface; dimensions are clamped
/// non-negative and default to zero when unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct Viewport {
    width: f32,
    height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Width over height; 1.0 for a degenerate (zero-height) viewport.
    pub fn aspect_ratio(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    pub fn center_x(&self) -> f32 {
        self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.height / 2.0
    }

    /// Map a surface-space pointer position to an offset from the
    /// viewport center (pixels, +x right, +y down).
    pub fn pointer_offset_from_center(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(x - self.center_x(), y - self.center_y())
    }
}
