//! Pushable scenery.

use gridspace::Cell;
use tracing::{debug, warn};

use crate::context::Context;
use crate::entity::{EntityId, EntityKind, MovableState};
use crate::world::World;

fn state_mut(world: &mut World, id: EntityId) -> Option<&mut MovableState> {
    match world.entities.get_mut(&id).map(|e| &mut e.kind) {
        Some(EntityKind::Movable(state)) => Some(state),
        _ => None,
    }
}

/// Relocates the entity. The first move reveals the hidden item, if any, on
/// the cell being vacated.
pub(crate) fn shift(world: &mut World, ctx: &mut Context<'_>, id: EntityId, to: Cell) -> bool {
    let Some((room, from)) = world
        .entities
        .get(&id)
        .and_then(|e| Some((e.room()?, e.cell())))
    else {
        return false;
    };
    if !world.rooms.get(&room).is_some_and(|r| r.bounds().contains(to)) {
        return false;
    }
    let Some(state) = state_mut(world, id) else {
        return false;
    };
    let reveal = if state.moved { None } else { state.hidden_item };

    if let Some(item) = reveal {
        match world.reveal_item(room, from, item, ctx) {
            Ok(pick) => debug!(entity = %id, item = %item, pickable = %pick, "hidden item revealed"),
            Err(err) => warn!(entity = %id, error = %err, "hidden item not revealed"),
        }
    }
    if let Some(state) = state_mut(world, id) {
        state.moved = true;
    }
    world.update_position(id, Some(to.x), Some(to.y), ctx)
}
