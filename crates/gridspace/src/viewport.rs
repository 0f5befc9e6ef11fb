//! The visible window over a room.
//!
//! Rooms can be larger than the screen. The viewport is a square window of
//! `side` cells whose top-left corner sits at `origin` in room pixel space;
//! scrolling moves the origin. Anything whose screen position falls outside
//! `[0, side_px)` on either axis is off-screen.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::grid::TileSize;

/// Square visible window over a room.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Room pixel position shown at the screen's top-left corner.
    pub origin: Vec2,
    /// Side length in cells.
    pub side: u32,
    /// Side length in pixels.
    pub side_px: f32,
}

impl Viewport {
    /// Creates a viewport of `side` cells, anchored at the room origin.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(side: u32, tile: TileSize) -> Self {
        Self {
            origin: Vec2::ZERO,
            side,
            side_px: side as f32 * tile.width,
        }
    }

    /// Converts a room pixel position to screen space.
    #[must_use]
    pub fn to_screen(&self, pos: Vec2) -> Vec2 {
        pos - self.origin
    }

    /// Returns true if the room pixel position `pos` is on screen.
    #[must_use]
    pub fn contains(&self, pos: Vec2) -> bool {
        let s = self.to_screen(pos);
        s.x >= 0.0 && s.x < self.side_px && s.y >= 0.0 && s.y < self.side_px
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(9, TileSize::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_nine_tiles_of_32px() {
        let v = Viewport::default();
        assert_eq!(v.side, 9);
        assert!((v.side_px - 288.0).abs() < f32::EPSILON);
    }

    #[test]
    fn contains_is_half_open() {
        let v = Viewport::default();
        assert!(v.contains(Vec2::ZERO));
        assert!(v.contains(Vec2::new(287.0, 287.0)));
        assert!(!v.contains(Vec2::new(288.0, 0.0)));
        assert!(!v.contains(Vec2::new(0.0, 288.0)));
        assert!(!v.contains(Vec2::new(-1.0, 0.0)));
        assert!(!v.contains(Vec2::new(0.0, -0.5)));
    }

    #[test]
    fn scrolling_shifts_the_window() {
        let mut v = Viewport::default();
        v.origin = Vec2::new(96.0, 0.0);
        assert!(!v.contains(Vec2::new(64.0, 10.0)));
        assert!(v.contains(Vec2::new(300.0, 10.0)));
        assert_eq!(v.to_screen(Vec2::new(100.0, 5.0)), Vec2::new(4.0, 5.0));
    }
}
