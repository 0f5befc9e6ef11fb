//! Collaborator boundaries and the per-call context object.
//!
//! The encounter layer never draws, polls keys, moves the player or renders
//! speech bubbles itself. Those jobs belong to the host game, which implements
//! the traits below and lends them to the [`World`](crate::world::World) for
//! the duration of one call through a [`Context`].
//!
//! Handing the collaborators in explicitly (instead of reaching for a global
//! "current game") fixes their lifetime to the call: a behaviour can only talk
//! to the renderer, player or dialogue box while it is being driven by the
//! frame loop or by a player action.

use glam::Vec2;
use gridspace::Cell;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::behaviors::Continuation;
use crate::content::TileIndex;
use crate::entity::EntityId;
use crate::room::{MapCoord, RoomId};

/// Opaque handle to a visual created by the [`Renderer`].
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VisualHandle(u64);

impl VisualHandle {
    /// Wraps a renderer-specific handle value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the renderer-specific handle value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for VisualHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VisualHandle({})", self.0)
    }
}

/// Drawing layer a visual is placed on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    /// Room objects, the player and projectiles.
    Objects,
    /// Drawn above everything on [`Layer::Objects`] (door lintels and the like).
    Overlay,
}

/// Transient visual effects.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Played where a projectile connects.
    Explosion,
}

/// Input actions the encounter layer polls.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Confirms picking up the item the player is looking at.
    PickupConfirm,
}

/// Visual/rendering collaborator.
pub trait Renderer {
    /// Creates a visual showing `tile` with its top-left corner at `pos`.
    fn create(&mut self, tile: TileIndex, pos: Vec2, layer: Layer, z: i32) -> VisualHandle;

    /// Changes the tile shown by a visual.
    fn set_tile(&mut self, handle: VisualHandle, tile: TileIndex);

    /// Moves a visual.
    fn set_position(&mut self, handle: VisualHandle, pos: Vec2);

    /// Destroys a visual. The handle must not be used afterwards.
    fn remove(&mut self, handle: VisualHandle);

    /// Returns the candidates whose visuals overlap `handle`, in candidate order.
    fn overlapping(&self, handle: VisualHandle, candidates: &[VisualHandle]) -> Vec<VisualHandle>;

    /// Plays a one-off effect at `pos`.
    fn play_effect(&mut self, kind: EffectKind, pos: Vec2, duration_ms: u32);
}

/// Input collaborator, polled once per frame by behaviours that need it.
pub trait Input {
    /// Returns true while `action` is asserted.
    fn is_action_pressed(&self, action: Action) -> bool;
}

/// Player/inventory collaborator.
pub trait Player {
    /// Cell the player currently stands on.
    fn cell(&self) -> Cell;

    /// The player's visual, if it is on screen.
    fn visual(&self) -> Option<VisualHandle>;

    /// Damages the player.
    fn on_hit(&mut self, damage: i32);

    /// Starts the "press confirm to take it" mode for a pickable.
    fn enter_pickup_mode(&mut self, item: EntityId);

    /// Ends pickup mode. The pickable has already been removed from its room;
    /// its item id is still readable through [`World::get`](crate::world::World::get).
    ///
    /// `visual` is the pickable's sprite, showing the item tile. It is no longer
    /// tracked by the world and must be removed by the player once done with it.
    fn exit_pickup_mode(&mut self, visual: Option<VisualHandle>);

    /// Requests a move to another room.
    ///
    /// Called while the world is mid-update; the host performs the actual
    /// transition ([`World::leave`](crate::world::World::leave) then
    /// [`World::enter`](crate::world::World::enter)) once control returns.
    fn teleport_to_room(&mut self, room: RoomId, map: Option<MapCoord>, arrival: Option<Cell>);
}

/// Dialogue/UI collaborator.
pub trait Dialogue {
    /// Shows a speech bubble for `speaker`.
    ///
    /// When `on_complete` is set, the host must hand it back to
    /// [`World::resume`](crate::world::World::resume) once the player dismisses
    /// the message, and before it accepts further player input.
    fn show_speech(&mut self, speaker: EntityId, text: &str, on_complete: Option<Continuation>);

    /// Shows a one-shot notice.
    fn explain(&mut self, message: &str);
}

/// World-map collaborator: rooms addressed by map coordinate.
pub trait WorldMap {
    /// Room at a map coordinate, if any.
    fn room_at(&self, coord: MapCoord) -> Option<RoomId>;
}

/// Collaborators lent to the world for one call.
pub struct Context<'a> {
    /// Draws visuals.
    pub renderer: &'a mut dyn Renderer,
    /// Polled input state.
    pub input: &'a dyn Input,
    /// The player character.
    pub player: &'a mut dyn Player,
    /// Speech bubbles and notices.
    pub dialogue: &'a mut dyn Dialogue,
    /// Room lookup for map-addressed teleports.
    pub world_map: &'a dyn WorldMap,
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("player_cell", &self.player.cell())
            .finish_non_exhaustive()
    }
}
