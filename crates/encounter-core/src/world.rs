//! The world: entity arena, rooms, and the frame loop.
//!
//! `World` owns every entity and room. Collaborators are lent per call through
//! a [`Context`]; nothing here holds on to them between calls.
//!
//! # Frame loop
//!
//! [`World::tick`] runs one frame:
//!
//! 1. **SNAPSHOT**: copy the current room's member ids in insertion order;
//!    collision priority does not affect it
//! 2. **FRAME**: call each snapshot member's frame hook, skipping members
//!    removed earlier in the pass
//! 3. **PROJECTILES**: advance every projectile once
//! 4. **COMPACT**: drop registry tombstones
//!
//! Entities spawned during the pass are not visited until the next tick.
//!
//! # Determinism
//!
//! Entities live in a `BTreeMap` keyed by monotonically assigned ids and every
//! random decision draws from one `ChaCha8Rng` seeded from
//! [`EncounterConfig::seed`]. Same seed and same inputs give the same run.
//!
//! # Example
//!
//! ```
//! use encounter_core::config::EncounterConfig;
//! use encounter_core::content::Content;
//! use encounter_core::entity::Appearance;
//! use encounter_core::world::World;
//! use gridspace::{Cell, GridBounds};
//!
//! let mut world = World::new(EncounterConfig::default(), Content::new(0));
//! let room = world.create_room(GridBounds::new(15, 15));
//! let rock = world.spawn_static(room, Cell::new(3, 4), Appearance::Tile(12)).unwrap();
//!
//! assert_eq!(world.get_obstacle(room, Cell::new(3, 4)), Some(rock));
//! assert_eq!(world.get_obstacle(room, Cell::new(4, 4)), None);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use gridspace::{Cell, Direction, GridBounds, Vec2, Viewport};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::behaviors::{character, container, door, monster, movable, pickable, Continuation};
use crate::config::EncounterConfig;
use crate::content::{ContainerSet, Content, DoorSet, ItemId, TileIndex};
use crate::context::{Context, Layer, VisualHandle};
use crate::entity::{
    Actor, Appearance, Behaviour, CharacterState, ContainerState, DoorConfig, DoorState, Entity,
    EntityHook, EntityId, EntityKind, EntityTag, Gun, MonsterSpec, MonsterState, MovableState,
    PickableState,
};
use crate::error::SetupError;
use crate::projectile::{self, Projectile, ProjectileSystem};
use crate::room::{Quest, Room, RoomId};

// =============================================================================
// World
// =============================================================================

/// Entity arena, rooms, projectiles and the frame loop.
pub struct World {
    pub(crate) entities: BTreeMap<EntityId, Entity>,
    pub(crate) rooms: BTreeMap<RoomId, Room>,
    pub(crate) current_room: Option<RoomId>,
    pub(crate) projectiles: ProjectileSystem,
    pub(crate) viewport: Viewport,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) config: EncounterConfig,
    pub(crate) content: Arc<Content>,
    next_entity: u64,
    next_room: u64,
    tick: u64,
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("entities", &self.entities.len())
            .field("rooms", &self.rooms.len())
            .field("current_room", &self.current_room)
            .field("projectiles", &self.projectiles.len())
            .field("tick", &self.tick)
            .finish_non_exhaustive()
    }
}

impl World {
    /// Creates an empty world.
    #[must_use]
    pub fn new(config: EncounterConfig, content: impl Into<Arc<Content>>) -> Self {
        Self {
            entities: BTreeMap::new(),
            rooms: BTreeMap::new(),
            current_room: None,
            projectiles: ProjectileSystem::default(),
            viewport: config.viewport(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            content: content.into(),
            next_entity: 0,
            next_room: 0,
            tick: 0,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Looks up an entity, including removed ones.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// All entities in id order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Looks up a room.
    #[must_use]
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(&id)
    }

    /// The entered room, if any.
    #[must_use]
    pub const fn current_room(&self) -> Option<RoomId> {
        self.current_room
    }

    /// Projectiles in flight.
    #[must_use]
    pub const fn projectiles(&self) -> &ProjectileSystem {
        &self.projectiles
    }

    /// Configuration.
    #[must_use]
    pub const fn config(&self) -> &EncounterConfig {
        &self.config
    }

    /// Content tables.
    #[must_use]
    pub fn content(&self) -> &Content {
        &self.content
    }

    /// The visible window.
    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Scrolls the visible window.
    pub fn set_viewport_origin(&mut self, origin: Vec2) {
        self.viewport.origin = origin;
    }

    /// The world RNG, for host-side decisions that must replay with the seed.
    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Frames run so far.
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick
    }

    // =========================================================================
    // Setup
    // =========================================================================

    /// Creates an empty room.
    pub fn create_room(&mut self, bounds: GridBounds) -> RoomId {
        let id = RoomId::new(self.next_room);
        self.next_room += 1;
        self.rooms.insert(id, Room::new(id, bounds));
        id
    }

    /// Attaches a quest to a room.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::UnknownRoom`] if the room does not exist.
    pub fn set_quest(&mut self, room: RoomId, quest: Quest) -> Result<(), SetupError> {
        self.rooms
            .get_mut(&room)
            .ok_or(SetupError::UnknownRoom(room))?
            .set_quest(quest);
        Ok(())
    }

    fn resolve(&self, appearance: Appearance) -> Result<(TileIndex, Option<ItemId>), SetupError> {
        match appearance {
            Appearance::Tile(tile) => Ok((tile, None)),
            Appearance::Item(item) => Ok((self.content.item(item)?.tile, Some(item))),
        }
    }

    fn spawn(
        &mut self,
        room: RoomId,
        cell: Cell,
        tile: TileIndex,
        item: Option<ItemId>,
        kind: EntityKind,
    ) -> Result<EntityId, SetupError> {
        let registry = self.rooms.get_mut(&room).ok_or(SetupError::UnknownRoom(room))?;
        if !registry.bounds().contains(cell) {
            return Err(SetupError::OutOfBounds { room, cell });
        }
        let id = EntityId::new(self.next_entity);
        self.next_entity += 1;
        let tag = kind.tag();
        registry.add_obj(id);
        self.entities
            .insert(id, Entity::new(id, room, cell, tile, item, kind));
        debug!(entity = %id, kind = %tag, room = %room, cell = ?cell, "spawned");
        Ok(id)
    }

    /// Spawns plain scenery.
    ///
    /// # Errors
    ///
    /// Fails if the room is unknown, the cell is outside it, or the item
    /// appearance is not in the item table.
    pub fn spawn_static(
        &mut self,
        room: RoomId,
        cell: Cell,
        appearance: Appearance,
    ) -> Result<EntityId, SetupError> {
        let (tile, item) = self.resolve(appearance)?;
        self.spawn(room, cell, tile, item, EntityKind::Static)
    }

    /// Spawns pushable scenery, optionally hiding an item revealed by its first move.
    ///
    /// # Errors
    ///
    /// As [`World::spawn_static`], plus an unknown hidden item.
    pub fn spawn_movable(
        &mut self,
        room: RoomId,
        cell: Cell,
        appearance: Appearance,
        hidden_item: Option<ItemId>,
    ) -> Result<EntityId, SetupError> {
        let (tile, item) = self.resolve(appearance)?;
        self.content.check_items(hidden_item)?;
        let state = hidden_item.map_or_else(MovableState::default, MovableState::hiding);
        self.spawn(room, cell, tile, item, EntityKind::Movable(state))
    }

    /// Spawns a quest giver.
    ///
    /// # Errors
    ///
    /// As [`World::spawn_static`], plus desired or payment items missing from
    /// the item table.
    pub fn spawn_character(
        &mut self,
        room: RoomId,
        cell: Cell,
        appearance: Appearance,
        behaviour: Behaviour,
    ) -> Result<EntityId, SetupError> {
        let (tile, item) = self.resolve(appearance)?;
        self.content.check_items(
            behaviour
                .desired_items
                .iter()
                .copied()
                .chain(behaviour.payment_item),
        )?;
        let kind = EntityKind::Character(CharacterState::new(behaviour));
        self.spawn(room, cell, tile, item, kind)
    }

    /// Spawns a closed door.
    ///
    /// # Errors
    ///
    /// Fails if the room is unknown, the cell is outside it, or the key is not
    /// in the item table.
    pub fn spawn_door(
        &mut self,
        room: RoomId,
        cell: Cell,
        set: DoorSet,
        config: DoorConfig,
    ) -> Result<EntityId, SetupError> {
        self.content.check_items(config.required_key)?;
        let kind = EntityKind::Door(DoorState::new(set, config));
        self.spawn(room, cell, set.closed, None, kind)
    }

    /// Spawns a closed container holding at most one item.
    ///
    /// # Errors
    ///
    /// Fails if the room is unknown, the cell is outside it, or the item is not
    /// in the item table.
    pub fn spawn_container(
        &mut self,
        room: RoomId,
        cell: Cell,
        set: ContainerSet,
        stored_item: Option<ItemId>,
    ) -> Result<EntityId, SetupError> {
        self.content.check_items(stored_item)?;
        let kind = EntityKind::Container(ContainerState::new(set, stored_item));
        self.spawn(room, cell, set.closed, None, kind)
    }

    /// Spawns an item lying on the floor.
    ///
    /// # Errors
    ///
    /// Fails if the room is unknown, the cell is outside it, or the item is not
    /// in the item table.
    pub fn spawn_pickable(
        &mut self,
        room: RoomId,
        cell: Cell,
        item: ItemId,
    ) -> Result<EntityId, SetupError> {
        let tile = self.content.item(item)?.tile;
        let state = PickableState::new(tile, self.content.empty_tile());
        self.spawn(room, cell, tile, Some(item), EntityKind::Pickable(state))
    }

    /// Spawns a monster facing down.
    ///
    /// # Errors
    ///
    /// Fails if the room is unknown, the cell is outside it, the loot is not in
    /// the item table, the loot chance is not a probability, or the projectile
    /// family lacks a tile for some direction.
    pub fn spawn_monster(
        &mut self,
        room: RoomId,
        cell: Cell,
        spec: MonsterSpec,
    ) -> Result<EntityId, SetupError> {
        self.content.check_items(spec.loot)?;
        if let Some(chance) = spec.loot_chance {
            if !(0.0..=1.0).contains(&chance) {
                return Err(SetupError::InvalidChance(chance));
            }
        }
        let gun = match spec.gun {
            Some(gun) => {
                let family = gun
                    .family
                    .unwrap_or_else(|| self.config.default_projectile_family.clone());
                for direction in Direction::ALL {
                    self.content.projectile_tile(&family, direction)?;
                }
                Some(Gun {
                    family,
                    speed: gun.speed.unwrap_or(self.config.default_projectile_speed),
                    damage: gun.damage.unwrap_or(self.config.default_projectile_damage),
                    fire_delay: gun.fire_delay.unwrap_or(self.config.default_fire_delay),
                    fire_timer: 0,
                    sees_player: false,
                })
            }
            None => None,
        };
        let state = MonsterState {
            set: spec.set,
            facing: Direction::Down,
            walk_delay: spec.walk_delay,
            walk_timer: i32::try_from(spec.walk_delay).unwrap_or(i32::MAX),
            hp: spec.hp,
            max_hp: spec.hp,
            bite: spec.bite,
            loot: spec.loot,
            loot_chance: spec.loot_chance,
            gun,
        };
        let tile = state.facing_tile();
        self.spawn(room, cell, tile, None, EntityKind::Monster(state))
    }

    /// Installs the hook a container runs after releasing its item.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::UnknownEntity`] if `id` is not a container.
    pub fn set_on_open(&mut self, id: EntityId, hook: EntityHook) -> Result<(), SetupError> {
        match self.entities.get_mut(&id).map(|e| &mut e.kind) {
            Some(EntityKind::Container(state)) => {
                state.on_open = Some(hook);
                Ok(())
            }
            _ => Err(SetupError::UnknownEntity(id)),
        }
    }

    /// Installs the hook a pickable runs when the player confirms the pickup.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::UnknownEntity`] if `id` is not a pickable.
    pub fn set_on_pickup(&mut self, id: EntityId, hook: EntityHook) -> Result<(), SetupError> {
        match self.entities.get_mut(&id).map(|e| &mut e.kind) {
            Some(EntityKind::Pickable(state)) => {
                state.on_pickup = Some(hook);
                Ok(())
            }
            _ => Err(SetupError::UnknownEntity(id)),
        }
    }

    /// Spawns a pickable, enters it if its room is on screen, and promotes it
    /// to the front of the registry.
    pub(crate) fn reveal_item(
        &mut self,
        room: RoomId,
        cell: Cell,
        item: ItemId,
        ctx: &mut Context<'_>,
    ) -> Result<EntityId, SetupError> {
        let id = self.spawn_pickable(room, cell, item)?;
        if self.current_room == Some(room) {
            self.enter_room(id, ctx);
        }
        self.bring_to_front(id);
        Ok(id)
    }

    // =========================================================================
    // Entity lifecycle
    // =========================================================================

    /// Creates the entity's visual at its cell. No-op for removed or already
    /// entered entities.
    pub fn enter_room(&mut self, id: EntityId, ctx: &mut Context<'_>) {
        let tile_size = self.config.tile_size();
        let (object_z, overlay_z) = (self.config.object_z, self.config.overlay_z);
        let Some(entity) = self.entities.get_mut(&id) else {
            return;
        };
        if entity.room.is_none() || entity.visual.is_some() {
            return;
        }
        let pos = tile_size.offset(entity.cell);
        entity.visual = Some(ctx.renderer.create(entity.tile, pos, Layer::Objects, object_z));
        if let EntityKind::Door(door) = &mut entity.kind {
            if let Some(tile) = door.set.overlay {
                door.overlay = Some(ctx.renderer.create(tile, pos, Layer::Overlay, overlay_z));
            }
        }
    }

    /// Destroys the entity's visuals. Its logical state is kept.
    pub fn leave_room(&mut self, id: EntityId, ctx: &mut Context<'_>) {
        let Some(entity) = self.entities.get_mut(&id) else {
            return;
        };
        if let Some(visual) = entity.visual.take() {
            ctx.renderer.remove(visual);
        }
        if let EntityKind::Door(door) = &mut entity.kind {
            if let Some(overlay) = door.overlay.take() {
                ctx.renderer.remove(overlay);
            }
        }
    }

    /// Detaches the entity from its room for good.
    ///
    /// With `keep_visual` the base visual is not destroyed but handed back to
    /// the caller, who becomes its owner.
    pub fn remove(
        &mut self,
        id: EntityId,
        keep_visual: bool,
        ctx: &mut Context<'_>,
    ) -> Option<VisualHandle> {
        let kept = if keep_visual {
            self.entities.get_mut(&id).and_then(|e| e.visual.take())
        } else {
            None
        };
        self.leave_room(id, ctx);
        let entity = self.entities.get_mut(&id)?;
        if let Some(room) = entity.room.take() {
            if let Some(registry) = self.rooms.get_mut(&room) {
                registry.remove_obj(id);
            }
            debug!(entity = %id, room = %room, "removed");
        }
        kept
    }

    /// Changes the entity's appearance.
    pub fn update_tile(&mut self, id: EntityId, tile: TileIndex, ctx: &mut Context<'_>) {
        let Some(entity) = self.entities.get_mut(&id) else {
            return;
        };
        entity.tile = tile;
        if let Some(visual) = entity.visual {
            ctx.renderer.set_tile(visual, tile);
        }
    }

    /// Moves the entity. A `None` coordinate keeps the current one on that
    /// axis, so `(None, None)` only re-syncs the visuals. Returns false, leaving
    /// the entity in place, if the target is outside its room.
    pub fn update_position(
        &mut self,
        id: EntityId,
        x: Option<i32>,
        y: Option<i32>,
        ctx: &mut Context<'_>,
    ) -> bool {
        let tile_size = self.config.tile_size();
        let Some(entity) = self.entities.get_mut(&id) else {
            return false;
        };
        let target = Cell::new(x.unwrap_or(entity.cell.x), y.unwrap_or(entity.cell.y));
        let in_bounds = entity
            .room
            .and_then(|r| self.rooms.get(&r))
            .is_some_and(|r| r.bounds().contains(target));
        if !in_bounds {
            return false;
        }
        entity.cell = target;
        let pos = tile_size.offset(target);
        if let Some(visual) = entity.visual {
            ctx.renderer.set_position(visual, pos);
        }
        if let EntityKind::Door(DoorState { overlay: Some(overlay), .. }) = &entity.kind {
            ctx.renderer.set_position(*overlay, pos);
        }
        true
    }

    /// Promotes the entity to the front of its room's registry.
    pub fn bring_to_front(&mut self, id: EntityId) -> bool {
        let Some(room) = self.entities.get(&id).and_then(Entity::room) else {
            return false;
        };
        self.rooms
            .get_mut(&room)
            .is_some_and(|r| r.bring_to_front(id))
    }

    // =========================================================================
    // Rooms
    // =========================================================================

    /// Makes `room` the current room, leaving the previous one, and enters
    /// every member.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::UnknownRoom`] if the room does not exist.
    pub fn enter(&mut self, room: RoomId, ctx: &mut Context<'_>) -> Result<(), SetupError> {
        let members = self
            .rooms
            .get(&room)
            .ok_or(SetupError::UnknownRoom(room))?
            .snapshot();
        self.leave(ctx);
        self.current_room = Some(room);
        for id in members {
            self.enter_room(id, ctx);
        }
        debug!(room = %room, "room entered");
        Ok(())
    }

    /// Leaves the current room: every member's visuals are destroyed and
    /// projectiles in flight vanish.
    pub fn leave(&mut self, ctx: &mut Context<'_>) {
        let Some(room) = self.current_room.take() else {
            return;
        };
        let members = self.rooms.get(&room).map(Room::snapshot).unwrap_or_default();
        for id in members {
            self.leave_room(id, ctx);
        }
        for visual in self.projectiles.clear() {
            ctx.renderer.remove(visual);
        }
        debug!(room = %room, "room left");
    }

    /// Front-most obstacle of `room` standing on `cell`.
    #[must_use]
    pub fn get_obstacle(&self, room: RoomId, cell: Cell) -> Option<EntityId> {
        let registry = self.rooms.get(&room)?;
        registry.members().find(|id| {
            self.entities
                .get(id)
                .is_some_and(|e| e.obstacle && e.cell == cell)
        })
    }

    /// What blocks `cell` in the current room: an obstacle entity first, then
    /// the player.
    #[must_use]
    pub fn occupant_at(&self, cell: Cell, ctx: &Context<'_>) -> Option<Actor> {
        self.current_room
            .and_then(|room| self.get_obstacle(room, cell))
            .map(Actor::Entity)
            .or_else(|| (ctx.player.cell() == cell).then_some(Actor::Player))
    }

    // =========================================================================
    // Hooks
    // =========================================================================

    /// The player walked into `id`.
    pub fn on_bump(&mut self, id: EntityId, ctx: &mut Context<'_>) {
        let Some(tag) = self.entities.get(&id).map(Entity::tag) else {
            return;
        };
        match tag {
            EntityTag::Character => character::bump(self, ctx, id),
            EntityTag::Door => door::bump(self, ctx, id),
            EntityTag::Container => container::bump(self, ctx, id),
            EntityTag::Pickable => pickable::bump(self, ctx, id),
            EntityTag::Monster => monster::bump(self, ctx, id),
            EntityTag::Static | EntityTag::Movable => {}
        }
    }

    /// Bumps the front-most obstacle on `cell` of the current room. Returns
    /// whether there was one.
    pub fn bump_at(&mut self, cell: Cell, ctx: &mut Context<'_>) -> bool {
        let Some(id) = self
            .current_room
            .and_then(|room| self.get_obstacle(room, cell))
        else {
            return false;
        };
        self.on_bump(id, ctx);
        true
    }

    /// The player offers `item` to `id`. Returns true if the item was consumed
    /// and should leave the player's inventory.
    pub fn on_item(&mut self, id: EntityId, item: ItemId, ctx: &mut Context<'_>) -> bool {
        match self.entities.get(&id).map(Entity::tag) {
            Some(EntityTag::Character) => character::give(self, ctx, id, item),
            Some(EntityTag::Door) => door::give(self, ctx, id, item),
            _ => false,
        }
    }

    /// Damage connects with `id`.
    pub fn on_hit(&mut self, id: EntityId, damage: i32, ctx: &mut Context<'_>) {
        if self.entities.get(&id).map(Entity::tag) == Some(EntityTag::Monster) {
            monster::hit(self, ctx, id, damage);
        }
    }

    /// The player pushes or pulls `id` to `cell`. Returns false if `id` is not
    /// movable or `cell` is outside its room.
    pub fn on_move(&mut self, id: EntityId, cell: Cell, ctx: &mut Context<'_>) -> bool {
        movable::shift(self, ctx, id, cell)
    }

    /// Runs one frame of `id`'s logic.
    pub fn on_frame(&mut self, id: EntityId, ctx: &mut Context<'_>) {
        match self.entities.get(&id).map(Entity::tag) {
            Some(EntityTag::Pickable) => pickable::frame(self, ctx, id),
            Some(EntityTag::Monster) => monster::frame(self, ctx, id),
            _ => {}
        }
    }

    /// Runs work deferred until the player dismissed a speech bubble.
    pub fn resume(&mut self, continuation: Continuation, ctx: &mut Context<'_>) {
        match continuation {
            Continuation::CharacterSolved { character, item } => {
                character::finish_solved(self, ctx, character, item);
            }
            Continuation::CharacterBringMore { character, item } => {
                character::finish_bring_more(self, ctx, character, item);
            }
        }
    }

    /// Fires a projectile from `shooter`'s position in the current room.
    ///
    /// Does nothing when no room is entered or the shooting entity has been
    /// removed.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::UnknownProjectile`] if the family has no tile for
    /// `direction`.
    pub fn fire_projectile(
        &mut self,
        shooter: Actor,
        family: &str,
        direction: Direction,
        speed: f32,
        damage: i32,
        ctx: &mut Context<'_>,
    ) -> Result<(), SetupError> {
        let tile = self.content.projectile_tile(family, direction)?;
        if self.current_room.is_none() {
            return Ok(());
        }
        let Some(pos) = projectile::muzzle(self, ctx, shooter) else {
            return Ok(());
        };
        let visual = ctx
            .renderer
            .create(tile, pos, Layer::Objects, self.config.projectile_z);
        self.projectiles.push(Projectile {
            visual,
            pos,
            direction,
            speed,
            damage,
            shooter,
        });
        Ok(())
    }

    // =========================================================================
    // Frame loop
    // =========================================================================

    /// Runs one frame of the current room.
    pub fn tick(&mut self, ctx: &mut Context<'_>) {
        self.tick += 1;
        let Some(room) = self.current_room else {
            return;
        };
        let members = self.rooms.get(&room).map(Room::frame_order).unwrap_or_default();
        for id in members {
            if self.current_room != Some(room) {
                break;
            }
            let still_here = self.entities.get(&id).and_then(Entity::room) == Some(room);
            if still_here {
                self.on_frame(id, ctx);
            }
        }
        projectile::advance(self, ctx);
        for registry in self.rooms.values_mut() {
            registry.compact();
        }
    }
}
