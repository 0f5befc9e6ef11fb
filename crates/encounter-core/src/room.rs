//! Room registry: ordered membership of the entities in one room.
//!
//! The member sequence doubles as collision priority: the front member gets
//! first refusal in every ordered scan (obstacle queries, projectile hits).
//! Order changes only through three operations:
//!
//! - [`Room::add_obj`] appends (lowest priority)
//! - [`Room::remove_obj`] drops a member
//! - [`Room::bring_to_front`] promotes a member to the head
//!
//! # Removal during scans
//!
//! Behaviours add and remove members while the room is being iterated (a
//! container releases its loot, a monster dies mid-frame). Scans therefore run
//! over a [`Room::snapshot`] of member ids taken at scan start. Removal marks
//! the slot as a tombstone instead of shifting the sequence, and
//! [`Room::compact`] drops tombstones between ticks. Members appended during a
//! scan are picked up by the next scan.
//!
//! # Example
//!
//! ```
//! use encounter_core::room::{Room, RoomId};
//! use encounter_core::entity::EntityId;
//! use gridspace::GridBounds;
//!
//! let mut room = Room::new(RoomId::new(0), GridBounds::new(15, 15));
//! let (a, b) = (EntityId::new(1), EntityId::new(2));
//! room.add_obj(a);
//! room.add_obj(b);
//! room.bring_to_front(b);
//!
//! assert_eq!(room.members().collect::<Vec<_>>(), vec![b, a]);
//! ```

use std::fmt;

use gridspace::GridBounds;
use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// Identifier of a room.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoomId(u64);

impl RoomId {
    /// Creates a room id from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RoomId({})", self.0)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of a room on the world map.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MapCoord {
    /// Map column.
    pub x: i32,
    /// Map row.
    pub y: i32,
}

impl MapCoord {
    /// Creates a map coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Quest attached to a room. Solving the room's character sets `solved`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    /// Quest name, for logs and the host's quest journal.
    pub name: String,
    /// Set once the quest giver in the room is satisfied.
    pub solved: bool,
}

impl Quest {
    /// Creates an unsolved quest.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            solved: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    id: EntityId,
    live: bool,
    /// Insertion sequence; fixes the frame-update order.
    seq: u64,
}

/// A bounded grid with an ordered member sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    id: RoomId,
    bounds: GridBounds,
    slots: Vec<Slot>,
    next_seq: u64,
    quest: Option<Quest>,
}

impl Room {
    /// Creates an empty room.
    #[must_use]
    pub fn new(id: RoomId, bounds: GridBounds) -> Self {
        Self {
            id,
            bounds,
            slots: Vec::new(),
            next_seq: 0,
            quest: None,
        }
    }

    /// Room id.
    #[must_use]
    pub const fn id(&self) -> RoomId {
        self.id
    }

    /// Grid size.
    #[must_use]
    pub const fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// The room's quest, if any.
    #[must_use]
    pub const fn quest(&self) -> Option<&Quest> {
        self.quest.as_ref()
    }

    /// Mutable access to the room's quest.
    pub fn quest_mut(&mut self) -> Option<&mut Quest> {
        self.quest.as_mut()
    }

    /// Attaches a quest, replacing any previous one.
    pub fn set_quest(&mut self, quest: Quest) {
        self.quest = Some(quest);
    }

    /// Appends a member at the lowest priority.
    ///
    /// Adding an id that is already a live member is a no-op.
    pub fn add_obj(&mut self, id: EntityId) {
        if !self.contains(id) {
            let seq = self.next_seq;
            self.next_seq += 1;
            self.slots.push(Slot { id, live: true, seq });
        }
    }

    /// Removes a member. Returns false if it was not a member.
    pub fn remove_obj(&mut self, id: EntityId) -> bool {
        match self.slots.iter_mut().find(|s| s.live && s.id == id) {
            Some(slot) => {
                slot.live = false;
                true
            }
            None => false,
        }
    }

    /// Moves a member to the head of the sequence. Returns false if it was not
    /// a member.
    ///
    /// Only collision priority changes; [`Room::frame_order`] is untouched.
    pub fn bring_to_front(&mut self, id: EntityId) -> bool {
        let Some(index) = self.slots.iter().position(|s| s.live && s.id == id) else {
            return false;
        };
        let slot = self.slots.remove(index);
        self.slots.insert(0, slot);
        true
    }

    /// Returns true if `id` is a live member.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.slots.iter().any(|s| s.live && s.id == id)
    }

    /// Live members in priority order.
    pub fn members(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.slots.iter().filter(|s| s.live).map(|s| s.id)
    }

    /// Copy of the live member ids, for scans that may mutate the room.
    #[must_use]
    pub fn snapshot(&self) -> Vec<EntityId> {
        self.members().collect()
    }

    /// Live member ids in insertion order, the order frames are run in.
    #[must_use]
    pub fn frame_order(&self) -> Vec<EntityId> {
        let mut live: Vec<&Slot> = self.slots.iter().filter(|s| s.live).collect();
        live.sort_by_key(|s| s.seq);
        live.into_iter().map(|s| s.id).collect()
    }

    /// Priority index of a live member (0 = front).
    #[must_use]
    pub fn position(&self, id: EntityId) -> Option<usize> {
        self.members().position(|m| m == id)
    }

    /// Number of live members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members().count()
    }

    /// Returns true if the room has no live members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of removed slots awaiting [`Room::compact`].
    #[must_use]
    pub fn tombstones(&self) -> usize {
        self.slots.iter().filter(|s| !s.live).count()
    }

    /// Drops removed slots. Live order is unchanged.
    pub fn compact(&mut self) {
        self.slots.retain(|s| s.live);
    }
}
