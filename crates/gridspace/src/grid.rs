//! Grid bounds and cell-to-pixel conversion.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::rect::PixelRect;

/// Size of a room grid in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridBounds {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
}

impl GridBounds {
    /// Creates bounds of `width` columns by `height` rows.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true if `cell` lies on the grid.
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        u32::try_from(cell.x).is_ok_and(|x| x < self.width)
            && u32::try_from(cell.y).is_ok_and(|y| y < self.height)
    }

    /// Iterates every cell, row by row.
    #[allow(clippy::cast_possible_wrap)]
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let (w, h) = (self.width, self.height);
        (0..h).flat_map(move |y| (0..w).map(move |x| Cell::new(x as i32, y as i32)))
    }
}

impl Default for GridBounds {
    fn default() -> Self {
        Self::new(15, 15)
    }
}

/// Pixel dimensions of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileSize {
    /// Cell width in pixels.
    pub width: f32,
    /// Cell height in pixels.
    pub height: f32,
}

impl TileSize {
    /// Creates a tile size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Top-left pixel offset of `cell` within its room.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn offset(&self, cell: Cell) -> Vec2 {
        Vec2::new(cell.x as f32 * self.width, cell.y as f32 * self.height)
    }

    /// The pixel rectangle covered by a tile whose top-left corner is `pos`.
    #[must_use]
    pub fn rect_at(&self, pos: Vec2) -> PixelRect {
        PixelRect::new(pos, Vec2::new(self.width, self.height))
    }
}

impl Default for TileSize {
    fn default() -> Self {
        Self::new(32.0, 32.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_rejects_each_edge() {
        let b = GridBounds::new(15, 10);
        assert!(b.contains(Cell::new(0, 0)));
        assert!(b.contains(Cell::new(14, 9)));
        assert!(!b.contains(Cell::new(-1, 0)));
        assert!(!b.contains(Cell::new(0, -1)));
        assert!(!b.contains(Cell::new(15, 0)));
        assert!(!b.contains(Cell::new(0, 10)));
    }

    #[test]
    fn cells_covers_grid() {
        let b = GridBounds::new(3, 2);
        let cells: Vec<_> = b.cells().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], Cell::new(0, 0));
        assert_eq!(cells[5], Cell::new(2, 1));
    }

    #[test]
    fn offset_scales_by_tile_size() {
        let t = TileSize::default();
        assert_eq!(t.offset(Cell::new(0, 0)), Vec2::ZERO);
        assert_eq!(t.offset(Cell::new(6, 3)), Vec2::new(192.0, 96.0));
    }
}
