//! Recording collaborator doubles and world fixtures.
//!
//! [`Host`] bundles one double per collaborator trait and lends them out as a
//! [`Context`]. The renderer keeps every live visual so tests can assert on
//! tiles and positions, and answers overlap queries with real pixel geometry.

use std::collections::BTreeMap;

use glam::Vec2;
use gridspace::{Cell, GridBounds, TileSize};

use crate::behaviors::Continuation;
use crate::config::EncounterConfig;
use crate::content::{ContainerSet, Content, DirectionalTiles, DoorSet, ItemDef, ItemId};
use crate::context::{
    Action, Context, Dialogue, EffectKind, Input, Layer, Player, Renderer, VisualHandle, WorldMap,
};
use crate::entity::{EntityId, MonsterSpec};
use crate::room::{MapCoord, RoomId};
use crate::world::World;

// =============================================================================
// Content Fixtures
// =============================================================================

pub const EMPTY_TILE: u32 = 0;
pub const BOLT: ItemId = ItemId::new(1);
pub const WRENCH: ItemId = ItemId::new(2);
pub const CREDITS: ItemId = ItemId::new(3);
pub const RED_KEY: ItemId = ItemId::new(7);
pub const BLUE_KEY: ItemId = ItemId::new(8);
pub const BLASTER: ItemId = ItemId::new(42);

pub const DOOR: DoorSet = DoorSet {
    closed: 300,
    open: 301,
    overlay: None,
};
pub const ARCH: DoorSet = DoorSet {
    closed: 310,
    open: 311,
    overlay: Some(312),
};
pub const CRATE: ContainerSet = ContainerSet {
    closed: 320,
    open: 321,
};
pub const JAWA: DirectionalTiles = DirectionalTiles {
    up: 400,
    down: 401,
    left: 402,
    right: 403,
};

/// Item table with a handful of named items and the "red" projectile family.
pub fn test_content() -> Content {
    let mut content = Content::new(EMPTY_TILE);
    for (id, name) in [
        (BOLT, "Bolt"),
        (WRENCH, "Wrench"),
        (CREDITS, "Credits"),
        (RED_KEY, "Red key"),
        (BLUE_KEY, "Blue key"),
        (BLASTER, "Blaster"),
    ] {
        content.add_item(ItemDef {
            id,
            name: name.to_string(),
            tile: 100 + id.as_u32(),
        });
    }
    content.add_projectile_family(
        "red",
        DirectionalTiles {
            up: 200,
            down: 201,
            left: 202,
            right: 203,
        },
    );
    content
}

/// Tile of an item in [`test_content`].
pub const fn item_tile(item: ItemId) -> u32 {
    100 + item.as_u32()
}

/// A world with one empty 15x15 room.
pub fn test_world(seed: u64) -> (World, RoomId) {
    let mut world = World::new(EncounterConfig::default().with_seed(seed), test_content());
    let room = world.create_room(GridBounds::new(15, 15));
    (world, room)
}

/// A wandering monster that will not step for a long while.
pub fn sleepy_monster(hp: i32) -> MonsterSpec {
    MonsterSpec::wandering(JAWA, 1000, hp, 1)
}

/// Live pickables standing on `cell` in `room`.
pub fn pickables_at(world: &World, room: RoomId, cell: Cell) -> Vec<EntityId> {
    world
        .room(room)
        .map(|r| {
            r.members()
                .filter(|id| {
                    world
                        .get(*id)
                        .is_some_and(|e| e.as_pickable().is_some() && e.cell() == cell)
                })
                .collect()
        })
        .unwrap_or_default()
}

// =============================================================================
// Collaborator Doubles
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub tile: u32,
    pub pos: Vec2,
    pub layer: Layer,
    pub z: i32,
}

#[derive(Debug, Default)]
pub struct RecordingRenderer {
    next: u64,
    tile: TileSize,
    pub sprites: BTreeMap<VisualHandle, Sprite>,
    pub removed: Vec<VisualHandle>,
    pub effects: Vec<(EffectKind, Vec2, u32)>,
}

impl RecordingRenderer {
    pub fn sprite(&self, handle: VisualHandle) -> Option<&Sprite> {
        self.sprites.get(&handle)
    }

    pub fn on_layer(&self, layer: Layer) -> usize {
        self.sprites.values().filter(|s| s.layer == layer).count()
    }
}

impl Renderer for RecordingRenderer {
    fn create(&mut self, tile: u32, pos: Vec2, layer: Layer, z: i32) -> VisualHandle {
        let handle = VisualHandle::new(self.next);
        self.next += 1;
        self.sprites.insert(handle, Sprite { tile, pos, layer, z });
        handle
    }

    fn set_tile(&mut self, handle: VisualHandle, tile: u32) {
        if let Some(sprite) = self.sprites.get_mut(&handle) {
            sprite.tile = tile;
        }
    }

    fn set_position(&mut self, handle: VisualHandle, pos: Vec2) {
        if let Some(sprite) = self.sprites.get_mut(&handle) {
            sprite.pos = pos;
        }
    }

    fn remove(&mut self, handle: VisualHandle) {
        self.sprites.remove(&handle);
        self.removed.push(handle);
    }

    fn overlapping(&self, handle: VisualHandle, candidates: &[VisualHandle]) -> Vec<VisualHandle> {
        let Some(me) = self.sprites.get(&handle) else {
            return Vec::new();
        };
        let mine = self.tile.rect_at(me.pos);
        candidates
            .iter()
            .copied()
            .filter(|c| {
                self.sprites
                    .get(c)
                    .is_some_and(|s| self.tile.rect_at(s.pos).overlaps(&mine))
            })
            .collect()
    }

    fn play_effect(&mut self, kind: EffectKind, pos: Vec2, duration_ms: u32) {
        self.effects.push((kind, pos, duration_ms));
    }
}

#[derive(Debug, Default)]
pub struct FakeInput {
    pub confirm: bool,
}

impl Input for FakeInput {
    fn is_action_pressed(&self, action: Action) -> bool {
        match action {
            Action::PickupConfirm => self.confirm,
        }
    }
}

#[derive(Debug, Default)]
pub struct FakePlayer {
    pub cell: Cell,
    pub visual: Option<VisualHandle>,
    pub hits: Vec<i32>,
    pub pickup: Option<EntityId>,
    pub pickups_finished: u32,
    pub carried: Vec<VisualHandle>,
    pub teleports: Vec<(RoomId, Option<MapCoord>, Option<Cell>)>,
}

impl Player for FakePlayer {
    fn cell(&self) -> Cell {
        self.cell
    }

    fn visual(&self) -> Option<VisualHandle> {
        self.visual
    }

    fn on_hit(&mut self, damage: i32) {
        self.hits.push(damage);
    }

    fn enter_pickup_mode(&mut self, item: EntityId) {
        self.pickup = Some(item);
    }

    fn exit_pickup_mode(&mut self, visual: Option<VisualHandle>) {
        self.pickup = None;
        self.pickups_finished += 1;
        self.carried.extend(visual);
    }

    fn teleport_to_room(&mut self, room: RoomId, map: Option<MapCoord>, arrival: Option<Cell>) {
        self.teleports.push((room, map, arrival));
    }
}

#[derive(Debug, Default)]
pub struct RecordingDialogue {
    pub speech: Vec<(EntityId, String, Option<Continuation>)>,
    pub notices: Vec<String>,
}

impl RecordingDialogue {
    pub fn last_text(&self) -> Option<&str> {
        self.speech.last().map(|(_, text, _)| text.as_str())
    }
}

impl Dialogue for RecordingDialogue {
    fn show_speech(&mut self, speaker: EntityId, text: &str, on_complete: Option<Continuation>) {
        self.speech.push((speaker, text.to_string(), on_complete));
    }

    fn explain(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}

#[derive(Debug, Default)]
pub struct FakeMap {
    pub rooms: BTreeMap<MapCoord, RoomId>,
}

impl WorldMap for FakeMap {
    fn room_at(&self, coord: MapCoord) -> Option<RoomId> {
        self.rooms.get(&coord).copied()
    }
}

/// One double per collaborator.
#[derive(Debug, Default)]
pub struct Host {
    pub renderer: RecordingRenderer,
    pub input: FakeInput,
    pub player: FakePlayer,
    pub dialogue: RecordingDialogue,
    pub map: FakeMap,
}

impl Host {
    pub fn at(cell: Cell) -> Self {
        let mut host = Self::default();
        host.player.cell = cell;
        host
    }

    pub fn ctx(&mut self) -> Context<'_> {
        Context {
            renderer: &mut self.renderer,
            input: &self.input,
            player: &mut self.player,
            dialogue: &mut self.dialogue,
            world_map: &self.map,
        }
    }

    /// Gives the player an on-screen visual at their cell.
    pub fn show_player(&mut self) {
        let pos = TileSize::default().offset(self.player.cell);
        self.player.visual = Some(self.renderer.create(1, pos, Layer::Objects, 10));
    }

    /// Dismisses the most recent speech bubble, resuming its continuation.
    pub fn dismiss(&mut self, world: &mut World) {
        let pending = self.dialogue.speech.last_mut().and_then(|(_, _, next)| next.take());
        if let Some(next) = pending {
            world.resume(next, &mut self.ctx());
        }
    }

    pub fn tick(&mut self, world: &mut World, frames: u32) {
        for _ in 0..frames {
            world.tick(&mut self.ctx());
        }
    }
}
