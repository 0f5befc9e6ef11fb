//! Entity model for room objects.
//!
//! Every in-room object shares one base record, [`Entity`]: a grid cell, an
//! appearance tile, an obstacle flag, the owning room and the visual handle the
//! renderer gave it. What the object *does* lives in [`EntityKind`], a closed
//! set of behaviours dispatched with a `match`:
//!
//! - [`EntityKind::Static`]: scenery, a plain obstacle
//! - [`EntityKind::Movable`]: scenery the player can push, optionally hiding an item
//! - [`EntityKind::Character`]: dialogue/quest giver
//! - [`EntityKind::Door`]: opens, optionally teleports
//! - [`EntityKind::Container`]: releases its loot once
//! - [`EntityKind::Pickable`]: an item waiting to be picked up
//! - [`EntityKind::Monster`]: wanders, bites, optionally shoots
//!
//! Which hooks a kind responds to is reported by [`Entity::capabilities`].
//! Hooks a kind does not implement are no-ops.
//!
//! # Invariants
//!
//! - An entity has a visual iff it is entered in the world's current room
//! - An entity's cell is always inside its room's bounds

pub mod components;

use bitflags::bitflags;
use gridspace::Cell;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::content::{ItemId, TileIndex};
use crate::context::VisualHandle;
use crate::room::RoomId;

pub use components::{
    Behaviour, CharacterState, ContainerState, DoorConfig, DoorState, EntityHook, Gun, GunSpec,
    ItemHook, MonsterSpec, MonsterState, MovableState, PickPhase, PickableState, QuestState,
    TeleportTarget,
};

/// Unique identifier for an entity.
///
/// Ids are assigned monotonically by the world and never reused, so they stay
/// valid as stable handles across frames and room transitions.
///
/// ```
/// use encounter_core::entity::EntityId;
///
/// let id = EntityId::new(4);
/// assert_eq!(id.as_u64(), 4);
/// assert!(EntityId::new(1) < id);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new `EntityId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// Something that can occupy a cell, fire a projectile or be hit by one.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Actor {
    /// The player character.
    Player,
    /// A room entity.
    Entity(EntityId),
}

/// How an entity looks when spawned: a raw tile or the tile of an item.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Appearance {
    /// A tile index used as-is.
    Tile(TileIndex),
    /// The tile of this item in the item table.
    Item(ItemId),
}

bitflags! {
    /// Hooks an entity responds to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Capabilities: u8 {
        /// Can be pushed/pulled by the player.
        const MOVE = 1 << 0;
        /// Reacts when the player walks into it.
        const BUMP = 1 << 1;
        /// Reacts when the player offers an item.
        const ITEM = 1 << 2;
        /// Reacts to damage.
        const HIT = 1 << 3;
        /// Runs logic every frame.
        const FRAME = 1 << 4;
    }
}

/// Entity type tag, for logs and quick type checks.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    /// Scenery.
    Static,
    /// Pushable scenery.
    Movable,
    /// Quest giver.
    Character,
    /// Door or teleporter.
    Door,
    /// Chest, crate, locker.
    Container,
    /// Item on the floor.
    Pickable,
    /// Wandering or shooting monster.
    Monster,
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Static => "Static",
            Self::Movable => "Movable",
            Self::Character => "Character",
            Self::Door => "Door",
            Self::Container => "Container",
            Self::Pickable => "Pickable",
            Self::Monster => "Monster",
        };
        f.write_str(name)
    }
}

/// Behaviour-specific state.
#[derive(Debug)]
pub enum EntityKind {
    /// Plain obstacle.
    Static,
    /// Pushable, optionally hiding an item underneath.
    Movable(MovableState),
    /// Dialogue/quest state machine.
    Character(CharacterState),
    /// Open/teleport state machine.
    Door(DoorState),
    /// One-shot loot state machine.
    Container(ContainerState),
    /// Blink/collect state machine.
    Pickable(PickableState),
    /// Random-walk AI with optional ranged attack.
    Monster(MonsterState),
}

impl EntityKind {
    /// Tag of this kind.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        match self {
            Self::Static => EntityTag::Static,
            Self::Movable(_) => EntityTag::Movable,
            Self::Character(_) => EntityTag::Character,
            Self::Door(_) => EntityTag::Door,
            Self::Container(_) => EntityTag::Container,
            Self::Pickable(_) => EntityTag::Pickable,
            Self::Monster(_) => EntityTag::Monster,
        }
    }
}

/// A room object.
#[derive(Debug)]
pub struct Entity {
    id: EntityId,
    pub(crate) cell: Cell,
    pub(crate) tile: TileIndex,
    pub(crate) item: Option<ItemId>,
    pub(crate) obstacle: bool,
    pub(crate) room: Option<RoomId>,
    pub(crate) visual: Option<VisualHandle>,
    pub(crate) kind: EntityKind,
}

impl Entity {
    /// Creates an obstacle entity owned by `room`. It has no visual until it
    /// enters the room.
    #[must_use]
    pub fn new(
        id: EntityId,
        room: RoomId,
        cell: Cell,
        tile: TileIndex,
        item: Option<ItemId>,
        kind: EntityKind,
    ) -> Self {
        Self {
            id,
            cell,
            tile,
            item,
            obstacle: true,
            room: Some(room),
            visual: None,
            kind,
        }
    }

    /// The entity's id.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Current cell.
    #[must_use]
    pub const fn cell(&self) -> Cell {
        self.cell
    }

    /// Current appearance tile.
    #[must_use]
    pub const fn tile(&self) -> TileIndex {
        self.tile
    }

    /// Item this entity represents, for pickables and item-configured characters.
    #[must_use]
    pub const fn item(&self) -> Option<ItemId> {
        self.item
    }

    /// Returns true if the entity blocks traversal.
    #[must_use]
    pub const fn is_obstacle(&self) -> bool {
        self.obstacle
    }

    /// Owning room, `None` once removed.
    #[must_use]
    pub const fn room(&self) -> Option<RoomId> {
        self.room
    }

    /// Visual handle, present while entered in the current room.
    #[must_use]
    pub const fn visual(&self) -> Option<VisualHandle> {
        self.visual
    }

    /// Behaviour state.
    #[must_use]
    pub const fn kind(&self) -> &EntityKind {
        &self.kind
    }

    /// Type tag.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        self.kind.tag()
    }

    /// Hooks this entity currently responds to.
    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        match &self.kind {
            EntityKind::Static => Capabilities::empty(),
            EntityKind::Movable(_) => Capabilities::MOVE,
            EntityKind::Character(_) | EntityKind::Door(_) => Capabilities::BUMP | Capabilities::ITEM,
            EntityKind::Container(c) if c.bump_enabled => Capabilities::BUMP,
            EntityKind::Container(_) => Capabilities::empty(),
            EntityKind::Pickable(_) => Capabilities::BUMP | Capabilities::FRAME,
            EntityKind::Monster(_) => Capabilities::BUMP | Capabilities::HIT | Capabilities::FRAME,
        }
    }

    /// Returns the character state, if this is a character.
    #[must_use]
    pub const fn as_character(&self) -> Option<&CharacterState> {
        match &self.kind {
            EntityKind::Character(state) => Some(state),
            _ => None,
        }
    }

    /// Returns the door state, if this is a door.
    #[must_use]
    pub const fn as_door(&self) -> Option<&DoorState> {
        match &self.kind {
            EntityKind::Door(state) => Some(state),
            _ => None,
        }
    }

    /// Returns the container state, if this is a container.
    #[must_use]
    pub const fn as_container(&self) -> Option<&ContainerState> {
        match &self.kind {
            EntityKind::Container(state) => Some(state),
            _ => None,
        }
    }

    /// Returns the pickable state, if this is a pickable.
    #[must_use]
    pub const fn as_pickable(&self) -> Option<&PickableState> {
        match &self.kind {
            EntityKind::Pickable(state) => Some(state),
            _ => None,
        }
    }

    /// Returns the monster state, if this is a monster.
    #[must_use]
    pub const fn as_monster(&self) -> Option<&MonsterState> {
        match &self.kind {
            EntityKind::Monster(state) => Some(state),
            _ => None,
        }
    }

    /// Returns the movable state, if this is pushable.
    #[must_use]
    pub const fn as_movable(&self) -> Option<&MovableState> {
        match &self.kind {
            EntityKind::Movable(state) => Some(state),
            _ => None,
        }
    }
}
