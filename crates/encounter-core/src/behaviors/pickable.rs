//! Blink/collect state machine: `Idle -> Blinking`, left by removal.

use tracing::debug;

use crate::context::{Action, Context};
use crate::entity::{Entity, EntityId, EntityKind, PickPhase, PickableState};
use crate::world::World;

fn state_mut(world: &mut World, id: EntityId) -> Option<&mut PickableState> {
    match world.entities.get_mut(&id).map(|e| &mut e.kind) {
        Some(EntityKind::Pickable(state)) => Some(state),
        _ => None,
    }
}

pub(crate) fn bump(world: &mut World, ctx: &mut Context<'_>, id: EntityId) {
    let grace = world.config.pickup_grace;
    let Some(pickable) = state_mut(world, id) else {
        return;
    };
    pickable.phase = PickPhase::Blinking;
    pickable.take_delay = grace;
    debug!(entity = %id, "pickup offered");
    ctx.player.enter_pickup_mode(id);
}

pub(crate) fn frame(world: &mut World, ctx: &mut Context<'_>, id: EntityId) {
    let cadence = world.config.blink_delay;
    let visual = world.entities.get(&id).and_then(|e| e.visual());
    let Some(pickable) = state_mut(world, id) else {
        return;
    };
    if pickable.phase != PickPhase::Blinking {
        return;
    }

    pickable.blink_delay = pickable.blink_delay.saturating_sub(1);
    if pickable.blink_delay == 0 {
        let tile = pickable.advance_blink();
        pickable.blink_delay = cadence;
        if let Some(visual) = visual {
            ctx.renderer.set_tile(visual, tile);
        }
    }
    pickable.take_delay = pickable.take_delay.saturating_sub(1);
    if pickable.take_delay > 0 || !ctx.input.is_action_pressed(Action::PickupConfirm) {
        return;
    }

    debug!(entity = %id, "pickup confirmed");
    if let Some(mut hook) = pickable.on_pickup.take() {
        hook.call(world, ctx, id);
        if let Some(pickable) = state_mut(world, id) {
            pickable.on_pickup.get_or_insert(hook);
        }
    }
    let tile = world.entities.get(&id).map(Entity::tile);
    let kept = world.remove(id, true, ctx);
    if let (Some(visual), Some(tile)) = (kept, tile) {
        ctx.renderer.set_tile(visual, tile);
    }
    ctx.player.exit_pickup_mode(kept);
}
