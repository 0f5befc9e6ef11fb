//! Transient projectiles and their collision resolution.
//!
//! Projectiles are not room members: they live in a [`ProjectileSystem`] owned
//! by the world and only exist while a room is entered. Each tick every
//! projectile is advanced once:
//!
//! 1. If its last rendered position is off-screen it is dropped without a hit
//! 2. Otherwise it moves by `direction * speed` and its visual follows
//! 3. Its visual is tested against the player's visual, then the visuals of the
//!    current room's obstacles in priority order
//! 4. The first overlapping candidate that is not the shooter takes the hit;
//!    the projectile is then gone, so at most one target is ever damaged

use std::mem;

use glam::Vec2;
use gridspace::Direction;
use tracing::debug;

use crate::context::{Context, EffectKind, VisualHandle};
use crate::entity::{Actor, Entity};
use crate::world::World;

/// A projectile in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub(crate) visual: VisualHandle,
    pub(crate) pos: Vec2,
    pub(crate) direction: Direction,
    pub(crate) speed: f32,
    pub(crate) damage: i32,
    pub(crate) shooter: Actor,
}

impl Projectile {
    /// Current room pixel position.
    #[must_use]
    pub const fn pos(&self) -> Vec2 {
        self.pos
    }

    /// Flight direction.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Damage dealt on hit.
    #[must_use]
    pub const fn damage(&self) -> i32 {
        self.damage
    }

    /// Who fired it.
    #[must_use]
    pub const fn shooter(&self) -> Actor {
        self.shooter
    }

    /// The projectile's visual.
    #[must_use]
    pub const fn visual(&self) -> VisualHandle {
        self.visual
    }
}

/// Projectiles in flight in the current room.
#[derive(Debug, Clone, Default)]
pub struct ProjectileSystem {
    live: Vec<Projectile>,
}

impl ProjectileSystem {
    /// Number of projectiles in flight.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Returns true if nothing is in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Projectiles in firing order.
    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.live.iter()
    }

    pub(crate) fn push(&mut self, projectile: Projectile) {
        self.live.push(projectile);
    }

    /// Removes every projectile, returning their visuals.
    pub(crate) fn clear(&mut self) -> Vec<VisualHandle> {
        self.live.drain(..).map(|p| p.visual).collect()
    }
}

#[allow(clippy::cast_precision_loss)]
fn unit(direction: Direction) -> Vec2 {
    let (dx, dy) = direction.delta();
    Vec2::new(dx as f32, dy as f32)
}

/// Player first, then the current room's obstacles in priority order.
fn candidates(world: &World, ctx: &Context<'_>) -> Vec<(Actor, VisualHandle)> {
    let mut out = Vec::new();
    if let Some(visual) = ctx.player.visual() {
        out.push((Actor::Player, visual));
    }
    let Some(room) = world.current_room.and_then(|r| world.rooms.get(&r)) else {
        return out;
    };
    out.extend(
        room.members()
            .filter_map(|id| world.entities.get(&id))
            .filter(|e| e.is_obstacle())
            .filter_map(|e| Some((Actor::Entity(e.id()), e.visual()?))),
    );
    out
}

fn victim_pos(world: &World, ctx: &Context<'_>, victim: Actor) -> Vec2 {
    let tile = world.config.tile_size();
    match victim {
        Actor::Player => tile.offset(ctx.player.cell()),
        Actor::Entity(id) => world
            .entities
            .get(&id)
            .map_or(Vec2::ZERO, |e| tile.offset(e.cell())),
    }
}

/// Advances every projectile by one frame.
pub(crate) fn advance(world: &mut World, ctx: &mut Context<'_>) {
    let flying = mem::take(&mut world.projectiles.live);
    let mut kept = Vec::with_capacity(flying.len());

    for mut p in flying {
        if !world.viewport.contains(p.pos) {
            debug!(pos = ?p.pos, "projectile left viewport");
            ctx.renderer.remove(p.visual);
            continue;
        }
        p.pos += unit(p.direction) * p.speed;
        ctx.renderer.set_position(p.visual, p.pos);

        let targets = candidates(world, ctx);
        let handles: Vec<VisualHandle> = targets.iter().map(|(_, v)| *v).collect();
        let victim = ctx
            .renderer
            .overlapping(p.visual, &handles)
            .into_iter()
            .filter_map(|hit| targets.iter().find(|(_, v)| *v == hit).map(|(a, _)| *a))
            .find(|actor| *actor != p.shooter);

        let Some(victim) = victim else {
            kept.push(p);
            continue;
        };
        let at = victim_pos(world, ctx, victim);
        ctx.renderer
            .play_effect(EffectKind::Explosion, at, world.config.impact_effect_ms);
        debug!(victim = ?victim, damage = p.damage, "projectile hit");
        match victim {
            Actor::Player => ctx.player.on_hit(p.damage),
            Actor::Entity(id) => world.on_hit(id, p.damage, ctx),
        }
        ctx.renderer.remove(p.visual);
    }

    // Shots fired by hit reactions.
    kept.append(&mut world.projectiles.live);
    world.projectiles.live = kept;
}

/// Pixel position a shot fired by `shooter` starts from.
pub(crate) fn muzzle(world: &World, ctx: &Context<'_>, shooter: Actor) -> Option<Vec2> {
    let tile = world.config.tile_size();
    match shooter {
        Actor::Player => Some(tile.offset(ctx.player.cell())),
        Actor::Entity(id) => world
            .entities
            .get(&id)
            .filter(|e| e.room().is_some())
            .map(Entity::cell)
            .map(|cell| tile.offset(cell)),
    }
}
