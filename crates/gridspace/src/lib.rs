//! # Gridspace
//!
//! Spatial substrate for tile rooms: the coordinates every interactive object,
//! monster and projectile is placed on.
//!
//! Rooms are rectangular grids of square cells. Game objects live on cells,
//! while their visuals (and projectiles) live in pixel space. This crate owns
//! the conversion between the two and the small amount of geometry the game
//! layer needs:
//!
//! - **Cells and directions**: [`Cell`], [`Direction`], orthogonal neighbours
//! - **Bounds**: [`GridBounds`] for rejecting off-grid cells
//! - **Pixel geometry**: [`TileSize`] offsets and [`PixelRect`] overlap
//! - **Viewport**: [`Viewport`], the visible window that scrolls over a room
//! - **Line of sight**: [`Ray`], a cell-by-cell walk along a facing direction
//!
//! ## Quick Start
//!
//! ```
//! use gridspace::{Cell, Direction, GridBounds, Ray};
//!
//! let bounds = GridBounds::new(15, 15);
//! let monster = Cell::new(2, 4);
//!
//! assert!(bounds.contains(monster.step(Direction::Left)));
//! assert!(!bounds.contains(Cell::new(-1, 4)));
//!
//! let seen: Vec<Cell> = Ray::new(monster, Direction::Right, 3).collect();
//! assert_eq!(seen, vec![Cell::new(3, 4), Cell::new(4, 4), Cell::new(5, 4)]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cell;
pub mod grid;
pub mod ray;
pub mod rect;
pub mod viewport;

// Re-exports for convenience
pub use cell::{Cell, Direction};
pub use grid::{GridBounds, TileSize};
pub use ray::Ray;
pub use rect::PixelRect;
pub use viewport::Viewport;

/// Pixel-space position type used for visuals and projectiles.
pub use glam::Vec2;
