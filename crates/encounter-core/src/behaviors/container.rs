//! One-shot loot state machine: `Closed -> Opened`.

use tracing::{debug, warn};

use crate::behaviors::pickable;
use crate::context::Context;
use crate::entity::{ContainerState, EntityId, EntityKind};
use crate::world::World;

fn state_mut(world: &mut World, id: EntityId) -> Option<&mut ContainerState> {
    match world.entities.get_mut(&id).map(|e| &mut e.kind) {
        Some(EntityKind::Container(state)) => Some(state),
        _ => None,
    }
}

pub(crate) fn bump(world: &mut World, ctx: &mut Context<'_>, id: EntityId) {
    let Some(container) = state_mut(world, id) else {
        return;
    };
    if !container.bump_enabled || container.opened {
        return;
    }
    container.opened = true;
    let (tile, stored) = (container.set.open, container.stored_item);
    world.update_tile(id, tile, ctx);
    debug!(entity = %id, item = ?stored, "container opened");

    // An empty container keeps reacting to bumps.
    let Some(item) = stored else {
        return;
    };
    let Some((room, cell)) = world.entities.get(&id).and_then(|e| Some((e.room()?, e.cell()))) else {
        return;
    };
    match world.reveal_item(room, cell, item, ctx) {
        Ok(pick) => pickable::bump(world, ctx, pick),
        Err(err) => {
            warn!(entity = %id, error = %err, "container loot not released");
            return;
        }
    }

    let Some(container) = state_mut(world, id) else {
        return;
    };
    container.bump_enabled = false;
    let Some(mut hook) = container.on_open.take() else {
        return;
    };
    hook.call(world, ctx, id);
    if let Some(container) = state_mut(world, id) {
        container.on_open.get_or_insert(hook);
    }
}
