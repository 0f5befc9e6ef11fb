//! Behaviour state machines, one module per entity kind.
//!
//! Each module exposes free functions taking the [`World`](crate::world::World)
//! and the call's [`Context`](crate::context::Context). The world's hook entry
//! points (`on_bump`, `on_item`, `on_hit`, `on_frame`, `on_move`) dispatch to
//! them by matching on [`EntityKind`](crate::entity::EntityKind).
//!
//! Work that must wait for the player to dismiss a speech bubble is described by
//! a [`Continuation`] value handed to the dialogue collaborator and later passed
//! back through [`World::resume`](crate::world::World::resume).

pub(crate) mod character;
pub(crate) mod container;
pub(crate) mod door;
pub(crate) mod monster;
pub(crate) mod movable;
pub(crate) mod pickable;

use serde::{Deserialize, Serialize};

use crate::content::ItemId;
use crate::entity::EntityId;

/// Deferred work scheduled behind a speech bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Continuation {
    /// Hand over the payment and run the solve hook.
    CharacterSolved {
        /// The satisfied character.
        character: EntityId,
        /// The item that completed the quest.
        item: ItemId,
    },
    /// Run the bring-more hook.
    CharacterBringMore {
        /// The character that received a desired item.
        character: EntityId,
        /// The item received.
        item: ItemId,
    },
}
