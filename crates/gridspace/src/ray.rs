//! Cell-by-cell rays for line-of-sight tracing.
//!
//! A [`Ray`] starts *next to* its origin and walks one cell per step along a
//! direction for at most `range` steps. It does not know about obstacles or
//! grid bounds; the caller stops iterating at whatever blocks the view.

use crate::cell::{Cell, Direction};

/// Iterator over the cells seen from `origin` looking towards `direction`.
#[derive(Debug, Clone)]
pub struct Ray {
    current: Cell,
    direction: Direction,
    remaining: u32,
}

impl Ray {
    /// Creates a ray of at most `range` cells. The origin itself is not yielded.
    #[must_use]
    pub const fn new(origin: Cell, direction: Direction, range: u32) -> Self {
        Self {
            current: origin,
            direction,
            remaining: range,
        }
    }
}

impl Iterator for Ray {
    type Item = Cell;

    fn next(&mut self) -> Option<Cell> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.current = self.current.step(self.direction);
        Some(self.current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Ray {}
