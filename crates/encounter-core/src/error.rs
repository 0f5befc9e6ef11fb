//! Setup-time errors.
//!
//! Interactions and frame updates never fail: missing templates or hooks mean
//! "do nothing" and invalid moves are filtered out. What can fail is building a
//! room, where malformed content should stop the game before play starts
//! rather than surface mid-frame.

use gridspace::Cell;

use crate::content::ItemId;
use crate::entity::EntityId;
use crate::room::RoomId;

/// Errors raised while loading content or populating rooms.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// Item id is not present in the item table.
    #[error("item {0} is not in the item table")]
    UnknownItem(ItemId),

    /// Projectile family has no tile for the requested direction.
    #[error("projectile family '{family}' has no tile facing {direction}")]
    UnknownProjectile {
        /// Family name, e.g. `"red"`.
        family: String,
        /// Requested direction.
        direction: gridspace::Direction,
    },

    /// Room id was never created in this world.
    #[error("room {0} does not exist")]
    UnknownRoom(RoomId),

    /// Entity id was never spawned in this world.
    #[error("entity {0} does not exist")]
    UnknownEntity(EntityId),

    /// Requested cell is outside the room grid.
    #[error("cell {cell} is outside room {room}")]
    OutOfBounds {
        /// Room the entity was placed in.
        room: RoomId,
        /// Offending cell.
        cell: Cell,
    },

    /// Probability outside `[0, 1]`.
    #[error("loot chance {0} is not a probability")]
    InvalidChance(f64),

    /// JSON content or configuration failed to parse.
    #[error("malformed content: {0}")]
    Malformed(#[from] serde_json::Error),
}
