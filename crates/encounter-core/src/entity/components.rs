//! State structs for each entity kind.
//!
//! Fields are crate-visible so the behaviour modules can drive the state
//! machines; read access for hosts and tests goes through the getters.

use std::fmt;

use gridspace::{Cell, Direction};

use crate::content::{ContainerSet, DoorSet, ItemId, MonsterSet, TileIndex};
use crate::context::{Context, VisualHandle};
use crate::entity::EntityId;
use crate::room::{MapCoord, RoomId};
use crate::world::World;

// =============================================================================
// Hooks
// =============================================================================

type ItemHookFn = dyn FnMut(&mut World, &mut Context<'_>, EntityId, ItemId);
type EntityHookFn = dyn FnMut(&mut World, &mut Context<'_>, EntityId);

/// Script hook receiving the entity it belongs to and an item id.
pub struct ItemHook(Box<ItemHookFn>);

impl ItemHook {
    /// Wraps a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: FnMut(&mut World, &mut Context<'_>, EntityId, ItemId) + 'static,
    {
        Self(Box::new(f))
    }

    pub(crate) fn call(&mut self, world: &mut World, ctx: &mut Context<'_>, id: EntityId, item: ItemId) {
        (self.0)(world, ctx, id, item);
    }
}

impl fmt::Debug for ItemHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ItemHook")
    }
}

/// Script hook receiving the entity it belongs to.
pub struct EntityHook(Box<EntityHookFn>);

impl EntityHook {
    /// Wraps a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: FnMut(&mut World, &mut Context<'_>, EntityId) + 'static,
    {
        Self(Box::new(f))
    }

    pub(crate) fn call(&mut self, world: &mut World, ctx: &mut Context<'_>, id: EntityId) {
        (self.0)(world, ctx, id);
    }
}

impl fmt::Debug for EntityHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EntityHook")
    }
}

// =============================================================================
// Movable
// =============================================================================

/// Pushable scenery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovableState {
    pub(crate) moved: bool,
    pub(crate) hidden_item: Option<ItemId>,
}

impl MovableState {
    /// Pushable scenery hiding `item` underneath until its first move.
    #[must_use]
    pub const fn hiding(item: ItemId) -> Self {
        Self {
            moved: false,
            hidden_item: Some(item),
        }
    }

    /// True once the entity has been moved at least once.
    #[must_use]
    pub const fn moved(&self) -> bool {
        self.moved
    }

    /// Item revealed by the first move.
    #[must_use]
    pub const fn hidden_item(&self) -> Option<ItemId> {
        self.hidden_item
    }
}

// =============================================================================
// Character
// =============================================================================

/// Progress of a character's quest. `Solved` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestState {
    /// Still wants items.
    Unsolved,
    /// Received everything.
    Solved,
}

/// What a character wants, what it says, and what it pays.
///
/// Templates may contain `%1` (the remaining desired items as a list) and `%2`
/// (the payment item's name). Templates left unset are simply not shown.
///
/// ```
/// use encounter_core::content::ItemId;
/// use encounter_core::entity::Behaviour;
///
/// let b = Behaviour::wants([ItemId::new(4), ItemId::new(5), ItemId::new(4)])
///     .unsolved("Bring me %1 and I'll give you %2.")
///     .pays(ItemId::new(9));
///
/// assert_eq!(b.desired_items(), &[ItemId::new(4), ItemId::new(5)]);
/// ```
#[derive(Debug, Default)]
pub struct Behaviour {
    pub(crate) desired_items: Vec<ItemId>,
    pub(crate) unsolved_text: Option<String>,
    pub(crate) solved_text: Option<String>,
    pub(crate) thankyou_text: Option<String>,
    pub(crate) notneeded_text: Option<String>,
    pub(crate) bringmore_text: Option<String>,
    pub(crate) payment_item: Option<ItemId>,
    pub(crate) on_solve: Option<ItemHook>,
    pub(crate) on_bring_more: Option<ItemHook>,
}

impl Behaviour {
    /// A character wanting `items`. Repeated ids are kept once, first
    /// occurrence first.
    #[must_use]
    pub fn wants(items: impl IntoIterator<Item = ItemId>) -> Self {
        let mut desired_items: Vec<ItemId> = Vec::new();
        for item in items {
            if !desired_items.contains(&item) {
                desired_items.push(item);
            }
        }
        Self {
            desired_items,
            ..Self::default()
        }
    }

    /// Said on bump while unsolved.
    #[must_use]
    pub fn unsolved(mut self, text: &str) -> Self {
        self.unsolved_text = Some(text.to_string());
        self
    }

    /// Said on bump once solved.
    #[must_use]
    pub fn solved(mut self, text: &str) -> Self {
        self.solved_text = Some(text.to_string());
        self
    }

    /// Said when the last desired item is handed over.
    #[must_use]
    pub fn thank_you(mut self, text: &str) -> Self {
        self.thankyou_text = Some(text.to_string());
        self
    }

    /// Said when offered an item it does not want.
    #[must_use]
    pub fn not_needed(mut self, text: &str) -> Self {
        self.notneeded_text = Some(text.to_string());
        self
    }

    /// Said when a desired item is handed over but more are still wanted.
    #[must_use]
    pub fn bring_more(mut self, text: &str) -> Self {
        self.bringmore_text = Some(text.to_string());
        self
    }

    /// Item handed to the player once solved.
    #[must_use]
    pub fn pays(mut self, item: ItemId) -> Self {
        self.payment_item = Some(item);
        self
    }

    /// Runs after the thank-you message is dismissed and the payment handed over.
    #[must_use]
    pub fn on_solve(mut self, hook: ItemHook) -> Self {
        self.on_solve = Some(hook);
        self
    }

    /// Runs after the bring-more message is dismissed (or right away without one).
    #[must_use]
    pub fn on_bring_more(mut self, hook: ItemHook) -> Self {
        self.on_bring_more = Some(hook);
        self
    }

    /// Items still wanted, in order.
    #[must_use]
    pub fn desired_items(&self) -> &[ItemId] {
        &self.desired_items
    }

    /// Payment item.
    #[must_use]
    pub const fn payment_item(&self) -> Option<ItemId> {
        self.payment_item
    }
}

/// Quest giver.
#[derive(Debug)]
pub struct CharacterState {
    pub(crate) behaviour: Behaviour,
    pub(crate) state: QuestState,
}

impl CharacterState {
    /// A new, unsolved character.
    #[must_use]
    pub const fn new(behaviour: Behaviour) -> Self {
        Self {
            behaviour,
            state: QuestState::Unsolved,
        }
    }

    /// Quest progress.
    #[must_use]
    pub const fn state(&self) -> QuestState {
        self.state
    }

    /// The character's configuration and remaining wants.
    #[must_use]
    pub const fn behaviour(&self) -> &Behaviour {
        &self.behaviour
    }
}

// =============================================================================
// Door
// =============================================================================

/// Where an open door sends the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeleportTarget {
    /// Room at a world-map coordinate.
    Map(MapCoord),
    /// A specific room.
    Room(RoomId),
}

/// Optional door configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DoorConfig {
    /// Makes the door a teleporter.
    pub teleport: Option<TeleportTarget>,
    /// Key item that opens the door.
    pub required_key: Option<ItemId>,
    /// Cell inside the target room where the player arrives.
    pub arrival: Option<Cell>,
}

/// Door or teleporter.
#[derive(Debug)]
pub struct DoorState {
    pub(crate) set: DoorSet,
    pub(crate) open: bool,
    pub(crate) config: DoorConfig,
    pub(crate) overlay: Option<VisualHandle>,
}

impl DoorState {
    /// A closed door.
    #[must_use]
    pub const fn new(set: DoorSet, config: DoorConfig) -> Self {
        Self {
            set,
            open: false,
            config,
            overlay: None,
        }
    }

    /// True while open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Door configuration.
    #[must_use]
    pub const fn config(&self) -> &DoorConfig {
        &self.config
    }

    /// Overlay visual, present while entered and the set has an overlay tile.
    #[must_use]
    pub const fn overlay(&self) -> Option<VisualHandle> {
        self.overlay
    }
}

// =============================================================================
// Container
// =============================================================================

/// Chest, crate or locker holding at most one item.
#[derive(Debug)]
pub struct ContainerState {
    pub(crate) set: ContainerSet,
    pub(crate) opened: bool,
    pub(crate) stored_item: Option<ItemId>,
    pub(crate) bump_enabled: bool,
    pub(crate) on_open: Option<EntityHook>,
}

impl ContainerState {
    /// A closed container.
    #[must_use]
    pub const fn new(set: ContainerSet, stored_item: Option<ItemId>) -> Self {
        Self {
            set,
            opened: false,
            stored_item,
            bump_enabled: true,
            on_open: None,
        }
    }

    /// True once opened.
    #[must_use]
    pub const fn is_opened(&self) -> bool {
        self.opened
    }

    /// False once the container has released its item.
    #[must_use]
    pub const fn bump_enabled(&self) -> bool {
        self.bump_enabled
    }

    /// Item inside.
    #[must_use]
    pub const fn stored_item(&self) -> Option<ItemId> {
        self.stored_item
    }
}

// =============================================================================
// Pickable
// =============================================================================

/// Pickup progress. Blinking ends by removal, never by going back to idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickPhase {
    /// Lying on the floor.
    Idle,
    /// Bumped; blinking until the player confirms.
    Blinking,
}

/// Item on the floor.
#[derive(Debug)]
pub struct PickableState {
    pub(crate) phase: PickPhase,
    pub(crate) blink_delay: u32,
    pub(crate) take_delay: u32,
    pub(crate) blink_tiles: [TileIndex; 2],
    pub(crate) next_blink: usize,
    pub(crate) on_pickup: Option<EntityHook>,
}

impl PickableState {
    /// An idle pickable that blinks between `empty_tile` and `tile`.
    #[must_use]
    pub const fn new(tile: TileIndex, empty_tile: TileIndex) -> Self {
        Self {
            phase: PickPhase::Idle,
            blink_delay: 0,
            take_delay: 0,
            blink_tiles: [empty_tile, tile],
            next_blink: 0,
            on_pickup: None,
        }
    }

    /// Pickup progress.
    #[must_use]
    pub const fn phase(&self) -> PickPhase {
        self.phase
    }

    /// Frames left before pickup confirm is accepted.
    #[must_use]
    pub const fn take_delay(&self) -> u32 {
        self.take_delay
    }

    /// Returns the tile to show next and advances the blink cycle.
    pub(crate) fn advance_blink(&mut self) -> TileIndex {
        let tile = self.blink_tiles[self.next_blink];
        self.next_blink = (self.next_blink + 1) % self.blink_tiles.len();
        tile
    }
}

// =============================================================================
// Monster
// =============================================================================

/// Ranged attack settings of a shooting monster. Unset fields take the
/// world's configured defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GunSpec {
    /// Frames between shots.
    pub fire_delay: Option<u32>,
    /// Projectile family name.
    pub family: Option<String>,
    /// Pixels per frame.
    pub speed: Option<f32>,
    /// Damage per hit.
    pub damage: Option<i32>,
}

/// Spawn parameters of a monster.
///
/// ```
/// use encounter_core::content::{DirectionalTiles, ItemId};
/// use encounter_core::entity::MonsterSpec;
///
/// let set = DirectionalTiles { up: 1, down: 2, left: 3, right: 4 };
/// let spec = MonsterSpec::wandering(set, 10, 3, 1)
///     .with_loot(ItemId::new(27))
///     .shooting();
/// assert!(spec.gun.is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MonsterSpec {
    /// Tiles per facing direction.
    pub set: MonsterSet,
    /// Mean frames between steps.
    pub walk_delay: u32,
    /// Starting health.
    pub hp: i32,
    /// Damage dealt to the player on contact.
    pub bite: i32,
    /// Item dropped on death.
    pub loot: Option<ItemId>,
    /// Probability of dropping `loot`; `None` always drops.
    pub loot_chance: Option<f64>,
    /// Ranged attack; `None` for a purely wandering monster.
    pub gun: Option<GunSpec>,
}

impl MonsterSpec {
    /// A wandering monster.
    #[must_use]
    pub const fn wandering(set: MonsterSet, walk_delay: u32, hp: i32, bite: i32) -> Self {
        Self {
            set,
            walk_delay,
            hp,
            bite,
            loot: None,
            loot_chance: None,
            gun: None,
        }
    }

    /// Drops `item` on death.
    #[must_use]
    pub const fn with_loot(mut self, item: ItemId) -> Self {
        self.loot = Some(item);
        self
    }

    /// Drops loot only with probability `chance`.
    #[must_use]
    pub const fn with_loot_chance(mut self, chance: f64) -> Self {
        self.loot_chance = Some(chance);
        self
    }

    /// Shoots on sight using the configured defaults.
    #[must_use]
    pub fn shooting(self) -> Self {
        self.with_gun(GunSpec::default())
    }

    /// Shoots on sight with custom gun settings.
    #[must_use]
    pub fn with_gun(mut self, gun: GunSpec) -> Self {
        self.gun = Some(gun);
        self
    }
}

/// Resolved ranged attack state.
#[derive(Debug, Clone, PartialEq)]
pub struct Gun {
    pub(crate) family: String,
    pub(crate) speed: f32,
    pub(crate) damage: i32,
    pub(crate) fire_delay: u32,
    pub(crate) fire_timer: u32,
    pub(crate) sees_player: bool,
}

impl Gun {
    /// True if the player was in clear line of sight on the last frame.
    #[must_use]
    pub const fn sees_player(&self) -> bool {
        self.sees_player
    }

    /// Frames until the next shot is allowed.
    #[must_use]
    pub const fn fire_timer(&self) -> u32 {
        self.fire_timer
    }

    /// Frames between shots.
    #[must_use]
    pub const fn fire_delay(&self) -> u32 {
        self.fire_delay
    }

    /// Projectile family.
    #[must_use]
    pub fn family(&self) -> &str {
        &self.family
    }
}

/// Wandering or shooting monster.
#[derive(Debug, Clone, PartialEq)]
pub struct MonsterState {
    pub(crate) set: MonsterSet,
    pub(crate) facing: Direction,
    pub(crate) walk_delay: u32,
    pub(crate) walk_timer: i32,
    pub(crate) hp: i32,
    pub(crate) max_hp: i32,
    pub(crate) bite: i32,
    pub(crate) loot: Option<ItemId>,
    pub(crate) loot_chance: Option<f64>,
    pub(crate) gun: Option<Gun>,
}

impl MonsterState {
    /// Facing direction.
    #[must_use]
    pub const fn facing(&self) -> Direction {
        self.facing
    }

    /// Current health.
    #[must_use]
    pub const fn hp(&self) -> i32 {
        self.hp
    }

    /// Starting health.
    #[must_use]
    pub const fn max_hp(&self) -> i32 {
        self.max_hp
    }

    /// Mean frames between steps.
    #[must_use]
    pub const fn walk_delay(&self) -> u32 {
        self.walk_delay
    }

    /// Frames until the next step.
    #[must_use]
    pub const fn walk_timer(&self) -> i32 {
        self.walk_timer
    }

    /// Ranged attack, for shooting monsters.
    #[must_use]
    pub const fn gun(&self) -> Option<&Gun> {
        self.gun.as_ref()
    }

    /// Tile for the current facing.
    #[must_use]
    pub const fn facing_tile(&self) -> TileIndex {
        self.set.get(self.facing)
    }
}
