//! # Encounter Core
//!
//! Interactive objects and encounters for tile-room adventure games.
//!
//! This crate models everything that lives in a room besides the player:
//! scenery, doors, containers, items on the floor, quest givers, monsters and
//! the projectiles they fire. It decides what happens when the player bumps
//! into something, hands it an item or shoots it, and runs the per-frame logic
//! of blinking pickups and wandering monsters.
//!
//! ## Architecture
//!
//! - **World**: entity arena, rooms, frame loop ([`world`])
//! - **Rooms**: ordered member registry doubling as collision priority ([`room`])
//! - **Entities**: base record plus a closed set of behaviour kinds ([`entity`])
//! - **Behaviours**: one state machine per kind ([`behaviors`])
//! - **Projectiles**: movement and single-hit resolution ([`projectile`])
//! - **Collaborators**: renderer, input, player, dialogue, world map ([`context`])
//!
//! Drawing, input polling, the player's own movement and inventory, and
//! dialogue widgets belong to the host game, which lends them to each call
//! through a [`context::Context`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use encounter_core::prelude::*;
//!
//! let mut world = World::new(EncounterConfig::default(), content);
//! let room = world.create_room(GridBounds::new(15, 15));
//! world.spawn_container(room, Cell::new(6, 3), crate_set, Some(blaster))?;
//! world.enter(room, &mut ctx)?;
//!
//! loop {
//!     world.tick(&mut ctx);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use gridspace;

pub mod behaviors;
pub mod config;
pub mod content;
pub mod context;
pub mod entity;
pub mod error;
pub mod projectile;
pub mod room;
pub mod world;

#[cfg(test)]
mod tests;

/// The types most hosts need.
pub mod prelude {
    pub use crate::behaviors::Continuation;
    pub use crate::config::EncounterConfig;
    pub use crate::content::{Content, ItemId};
    pub use crate::context::{Context, Dialogue, Input, Player, Renderer, WorldMap};
    pub use crate::entity::{Actor, Appearance, Behaviour, EntityId, MonsterSpec};
    pub use crate::error::SetupError;
    pub use crate::room::{Quest, RoomId};
    pub use crate::world::World;
    pub use gridspace::{Cell, Direction, GridBounds};
}
