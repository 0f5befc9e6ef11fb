//! Static content tables: items, door/container/monster tile sets, projectile
//! families.
//!
//! Content is read-only input to the encounter layer. Every id an entity is
//! configured with is validated against these tables when the entity is
//! spawned, so lookups during play cannot fail.
//!
//! # Example
//!
//! ```
//! use encounter_core::content::{Content, ItemId};
//!
//! let content = Content::from_json_str(r#"{
//!     "empty_tile": 0,
//!     "items": [
//!         { "id": 3, "name": "Red Key Card", "tile": 140 },
//!         { "id": 27, "name": "Medkit", "tile": 201 }
//!     ],
//!     "projectiles": {
//!         "red": { "up": 300, "down": 301, "left": 302, "right": 303 }
//!     }
//! }"#).unwrap();
//!
//! assert_eq!(content.item_name(ItemId::new(3)), "Red Key Card");
//! assert_eq!(content.item(ItemId::new(27)).unwrap().tile, 201);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use gridspace::Direction;
use serde::{Deserialize, Serialize};

use crate::error::SetupError;

/// Index into the renderer's tile sheet.
pub type TileIndex = u32;

/// Identifier of an item in the item table.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u32);

impl ItemId {
    /// Creates an item id from its raw table index.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw table index.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId({})", self.0)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of the item table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDef {
    /// Item id.
    pub id: ItemId,
    /// Display name used in speech and notices.
    pub name: String,
    /// Tile drawn for the item (and for characters configured by item id).
    pub tile: TileIndex,
}

/// Closed/open tiles of a door, plus an optional overlay drawn above actors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorSet {
    /// Tile while closed.
    pub closed: TileIndex,
    /// Tile while open.
    pub open: TileIndex,
    /// Tile of the secondary visual kept on top of the door, if any.
    #[serde(default)]
    pub overlay: Option<TileIndex>,
}

/// Closed/open tiles of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSet {
    /// Tile before the container is opened.
    pub closed: TileIndex,
    /// Tile once opened.
    pub open: TileIndex,
}

/// One tile per facing direction. Used for monsters and projectile families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionalTiles {
    /// Facing up.
    pub up: TileIndex,
    /// Facing down.
    pub down: TileIndex,
    /// Facing left.
    pub left: TileIndex,
    /// Facing right.
    pub right: TileIndex,
}

impl DirectionalTiles {
    /// Tile for `direction`.
    #[must_use]
    pub const fn get(&self, direction: Direction) -> TileIndex {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }
}

/// Directional tiles of a monster.
pub type MonsterSet = DirectionalTiles;

/// All static tables the encounter layer reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Content {
    empty_tile: TileIndex,
    items: BTreeMap<ItemId, ItemDef>,
    projectiles: BTreeMap<String, DirectionalTiles>,
    door_sets: BTreeMap<String, DoorSet>,
    container_sets: BTreeMap<String, ContainerSet>,
    monster_sets: BTreeMap<String, MonsterSet>,
}

/// JSON layout of [`Content`].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawContent {
    empty_tile: TileIndex,
    items: Vec<ItemDef>,
    projectiles: BTreeMap<String, DirectionalTiles>,
    door_sets: BTreeMap<String, DoorSet>,
    container_sets: BTreeMap<String, ContainerSet>,
    monster_sets: BTreeMap<String, MonsterSet>,
}

impl Content {
    /// Creates empty tables with the given blank tile.
    #[must_use]
    pub fn new(empty_tile: TileIndex) -> Self {
        Self {
            empty_tile,
            ..Self::default()
        }
    }

    /// Parses tables from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::Malformed`] if the document does not parse.
    pub fn from_json_str(json: &str) -> Result<Self, SetupError> {
        let raw: RawContent = serde_json::from_str(json)?;
        let mut content = Self {
            empty_tile: raw.empty_tile,
            projectiles: raw.projectiles,
            door_sets: raw.door_sets,
            container_sets: raw.container_sets,
            monster_sets: raw.monster_sets,
            ..Self::default()
        };
        for item in raw.items {
            content.add_item(item);
        }
        Ok(content)
    }

    /// Adds or replaces an item row.
    pub fn add_item(&mut self, item: ItemDef) -> &mut Self {
        self.items.insert(item.id, item);
        self
    }

    /// Adds or replaces a projectile family.
    pub fn add_projectile_family(&mut self, family: &str, tiles: DirectionalTiles) -> &mut Self {
        self.projectiles.insert(family.to_string(), tiles);
        self
    }

    /// Adds or replaces a named door set.
    pub fn add_door_set(&mut self, name: &str, set: DoorSet) -> &mut Self {
        self.door_sets.insert(name.to_string(), set);
        self
    }

    /// Adds or replaces a named container set.
    pub fn add_container_set(&mut self, name: &str, set: ContainerSet) -> &mut Self {
        self.container_sets.insert(name.to_string(), set);
        self
    }

    /// Adds or replaces a named monster set.
    pub fn add_monster_set(&mut self, name: &str, set: MonsterSet) -> &mut Self {
        self.monster_sets.insert(name.to_string(), set);
        self
    }

    /// The blank tile pickables alternate with while blinking.
    #[must_use]
    pub const fn empty_tile(&self) -> TileIndex {
        self.empty_tile
    }

    /// Looks up an item row.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::UnknownItem`] if the id is not in the table.
    pub fn item(&self, id: ItemId) -> Result<&ItemDef, SetupError> {
        self.items.get(&id).ok_or(SetupError::UnknownItem(id))
    }

    /// Fails unless every id is in the item table.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::UnknownItem`] for the first missing id.
    pub fn check_items(&self, ids: impl IntoIterator<Item = ItemId>) -> Result<(), SetupError> {
        ids.into_iter().try_for_each(|id| self.item(id).map(|_| ()))
    }

    /// Display name of an item, or an empty string for unknown ids.
    #[must_use]
    pub fn item_name(&self, id: ItemId) -> &str {
        self.items.get(&id).map_or("", |item| item.name.as_str())
    }

    /// Tile of a projectile family flying in `direction`.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::UnknownProjectile`] if the family is missing.
    pub fn projectile_tile(&self, family: &str, direction: Direction) -> Result<TileIndex, SetupError> {
        self.projectiles
            .get(family)
            .map(|tiles| tiles.get(direction))
            .ok_or_else(|| SetupError::UnknownProjectile {
                family: family.to_string(),
                direction,
            })
    }

    /// Named door set, if present.
    #[must_use]
    pub fn door_set(&self, name: &str) -> Option<DoorSet> {
        self.door_sets.get(name).copied()
    }

    /// Named container set, if present.
    #[must_use]
    pub fn container_set(&self, name: &str) -> Option<ContainerSet> {
        self.container_sets.get(name).copied()
    }

    /// Named monster set, if present.
    #[must_use]
    pub fn monster_set(&self, name: &str) -> Option<MonsterSet> {
        self.monster_sets.get(name).copied()
    }
}
