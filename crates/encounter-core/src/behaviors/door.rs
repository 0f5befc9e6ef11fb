//! Open/teleport state machine.
//!
//! An unkeyed teleporter closes again after each use. A keyed one stays open
//! once unlocked.

use tracing::{debug, warn};

use crate::content::ItemId;
use crate::context::Context;
use crate::entity::{DoorState, Entity, EntityId, EntityKind, TeleportTarget};
use crate::world::World;

fn state_mut(world: &mut World, id: EntityId) -> Option<&mut DoorState> {
    match world.entities.get_mut(&id).map(|e| &mut e.kind) {
        Some(EntityKind::Door(state)) => Some(state),
        _ => None,
    }
}

fn open(world: &mut World, ctx: &mut Context<'_>, id: EntityId) {
    let Some(door) = state_mut(world, id) else {
        return;
    };
    door.open = true;
    let (tile, walkable) = (door.set.open, door.config.teleport.is_none());
    world.update_tile(id, tile, ctx);
    if walkable {
        if let Some(entity) = world.entities.get_mut(&id) {
            entity.obstacle = false;
        }
    }
    debug!(entity = %id, "door opened");
}

fn close(world: &mut World, ctx: &mut Context<'_>, id: EntityId) {
    let Some(door) = state_mut(world, id) else {
        return;
    };
    door.open = false;
    let tile = door.set.closed;
    world.update_tile(id, tile, ctx);
    if let Some(entity) = world.entities.get_mut(&id) {
        entity.obstacle = true;
    }
    debug!(entity = %id, "door closed");
}

/// Asks the player to move. Returns false if the target does not resolve.
fn teleport(ctx: &mut Context<'_>, id: EntityId, door: &DoorState) -> bool {
    let Some(target) = door.config.teleport else {
        return false;
    };
    let (room, map) = match target {
        TeleportTarget::Room(room) => (room, None),
        TeleportTarget::Map(coord) => match ctx.world_map.room_at(coord) {
            Some(room) => (room, Some(coord)),
            None => {
                warn!(entity = %id, x = coord.x, y = coord.y, "no room at teleport target");
                return false;
            }
        },
    };
    debug!(entity = %id, room = %room, "teleporting player");
    ctx.player.teleport_to_room(room, map, door.config.arrival);
    true
}

pub(crate) fn bump(world: &mut World, ctx: &mut Context<'_>, id: EntityId) {
    let Some(door) = world.entities.get(&id).and_then(Entity::as_door) else {
        return;
    };
    let config = door.config;
    if door.open {
        if teleport(ctx, id, door) && config.required_key.is_none() {
            close(world, ctx, id);
        }
    } else if let Some(key) = config.required_key {
        let name = world.content.item_name(key);
        ctx.dialogue
            .explain(&format!("You need {name} to open this door."));
    } else {
        open(world, ctx, id);
    }
}

pub(crate) fn give(world: &mut World, ctx: &mut Context<'_>, id: EntityId, item: ItemId) -> bool {
    let Some(door) = world.entities.get(&id).and_then(Entity::as_door) else {
        return false;
    };
    let (required_key, is_open) = (door.config.required_key, door.open);
    match required_key {
        Some(key) if !is_open && key == item => {
            open(world, ctx, id);
            let name = world.content.item_name(item);
            ctx.dialogue
                .explain(&format!("You have used {name} to open the door."));
            true
        }
        Some(key) => {
            let name = world.content.item_name(key);
            ctx.dialogue.explain(&format!("Wrong key, you need {name}."));
            false
        }
        None => {
            ctx.dialogue.explain("This door does not need a key.");
            false
        }
    }
}
