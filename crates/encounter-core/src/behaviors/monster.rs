//! Monster AI: random walk, contact bites, and line-of-sight shooting.

use gridspace::{Cell, Direction, Ray};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use crate::context::Context;
use crate::entity::{Actor, Entity, EntityId, EntityKind, MonsterState};
use crate::room::RoomId;
use crate::world::World;

fn state_mut(world: &mut World, id: EntityId) -> Option<&mut MonsterState> {
    match world.entities.get_mut(&id).map(|e| &mut e.kind) {
        Some(EntityKind::Monster(state)) => Some(state),
        _ => None,
    }
}

fn placement(world: &World, id: EntityId) -> Option<(RoomId, Cell)> {
    let entity = world.entities.get(&id)?;
    Some((entity.room()?, entity.cell()))
}

/// Next walk countdown: `walk_delay` jittered by up to 12.5% either way, floored.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn rearm(walk_delay: u32, rng: &mut ChaCha8Rng) -> i32 {
    let delay = f64::from(walk_delay);
    let jitter = (rng.gen::<f64>() * delay * 0.25 - delay * 0.125).floor();
    i32::try_from(walk_delay)
        .unwrap_or(i32::MAX)
        .saturating_add(jitter as i32)
}

pub(crate) fn bump(world: &mut World, ctx: &mut Context<'_>, id: EntityId) {
    if let Some(monster) = world.entities.get(&id).and_then(Entity::as_monster) {
        ctx.player.on_hit(monster.bite);
    }
}

pub(crate) fn hit(world: &mut World, ctx: &mut Context<'_>, id: EntityId, damage: i32) {
    let Some((room, cell)) = placement(world, id) else {
        return;
    };
    let Some(monster) = state_mut(world, id) else {
        return;
    };
    monster.hp = monster.hp.saturating_sub(damage);
    debug!(entity = %id, damage, hp = monster.hp, "monster hit");
    if monster.hp > 0 {
        return;
    }

    let (loot, chance) = (monster.loot, monster.loot_chance);
    if let Some(loot) = loot {
        let drops = chance.map_or(true, |p| world.rng.gen::<f64>() < p);
        if drops {
            if let Err(err) = world.reveal_item(room, cell, loot, ctx) {
                warn!(entity = %id, error = %err, "monster loot not dropped");
            }
        }
    }
    debug!(entity = %id, cell = ?cell, "monster killed");
    world.remove(id, false, ctx);
}

pub(crate) fn frame(world: &mut World, ctx: &mut Context<'_>, id: EntityId) {
    let shoots = world
        .entities
        .get(&id)
        .and_then(Entity::as_monster)
        .is_some_and(|m| m.gun.is_some());
    if shoots && look_and_shoot(world, ctx, id) {
        return;
    }
    wander(world, ctx, id);
}

/// Traces along the facing direction, fires when the player is in clear view.
/// Returns whether the player was seen.
fn look_and_shoot(world: &mut World, ctx: &mut Context<'_>, id: EntityId) -> bool {
    let Some((room, cell)) = placement(world, id) else {
        return false;
    };
    let Some(facing) = world.entities.get(&id).and_then(Entity::as_monster).map(|m| m.facing) else {
        return false;
    };
    let player = ctx.player.cell();
    let mut sees = false;
    if cell.shares_line(player) {
        for seen in Ray::new(cell, facing, world.config.viewport_side) {
            if world.get_obstacle(room, seen).is_some() {
                break;
            }
            if seen == player {
                sees = true;
                break;
            }
        }
    }

    let Some(gun) = state_mut(world, id).and_then(|m| m.gun.as_mut()) else {
        return false;
    };
    gun.sees_player = sees;
    let fire = sees && gun.fire_timer == 0;
    if fire {
        gun.fire_timer = gun.fire_delay;
    }
    gun.fire_timer = gun.fire_timer.saturating_sub(1);

    if fire {
        let (family, speed, damage) = (gun.family.clone(), gun.speed, gun.damage);
        debug!(entity = %id, direction = %facing, "monster fires");
        if let Err(err) = world.fire_projectile(Actor::Entity(id), &family, facing, speed, damage, ctx) {
            warn!(entity = %id, error = %err, "shot not fired");
        }
    }
    sees
}

fn wander(world: &mut World, ctx: &mut Context<'_>, id: EntityId) {
    let Some((room, cell)) = placement(world, id) else {
        return;
    };
    let Some(monster) = state_mut(world, id) else {
        return;
    };
    monster.walk_timer = monster.walk_timer.saturating_sub(1);
    if monster.walk_timer > 0 {
        return;
    }
    let (facing, set, walk_delay) = (monster.facing, monster.set, monster.walk_delay);

    let bounds = world.rooms.get(&room).map(|r| r.bounds());
    let options: Vec<(Direction, Cell)> = cell
        .neighbors()
        .into_iter()
        .filter(|(_, c)| bounds.is_some_and(|b| b.contains(*c)))
        .filter(|(_, c)| world.get_obstacle(room, *c).is_none())
        .collect();

    if let Some(&(direction, target)) = options.choose(&mut world.rng) {
        if target == ctx.player.cell() {
            bump(world, ctx, id);
        } else {
            if direction != facing {
                if let Some(monster) = state_mut(world, id) {
                    monster.facing = direction;
                }
                world.update_tile(id, set.get(direction), ctx);
            }
            world.update_position(id, Some(target.x), Some(target.y), ctx);
        }
    }

    let timer = rearm(walk_delay, &mut world.rng);
    if let Some(monster) = state_mut(world, id) {
        monster.walk_timer = timer;
    }
}
